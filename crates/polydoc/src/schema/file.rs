use crate::core::model::{ComposeArgs, Hierarchy, Nested, Path, RecordError, Tag, Variant};
use serde::{Deserialize, Serialize};

///
/// FileRoot
/// Icons, covers and attachments: an emoji, an external link, or a hosted file.
///

pub enum FileRoot {}

impl Path for FileRoot {
    const PATH: &'static str = "polydoc::file";
}

impl Hierarchy for FileRoot {}

///
/// Emoji
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Emoji {
    pub emoji: String,
}

impl Variant for Emoji {
    type Root = FileRoot;

    const TAG: Tag = Tag::new("type", "emoji");

    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(1)?;

        Ok(Self {
            emoji: args.text(0)?.to_string(),
        })
    }
}

///
/// ExternalFile
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExternalFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub external: ExternalData,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExternalData {
    pub url: String,
}

impl Variant for ExternalFile {
    type Root = FileRoot;

    const TAG: Tag = Tag::new("type", "external");

    /// `(url, name?)`
    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(2)?;

        Ok(Self {
            name: args.optional_text(1)?.map(str::to_string),
            external: ExternalData {
                url: args.text(0)?.to_string(),
            },
        })
    }
}

impl Nested for ExternalFile {
    type Payload = ExternalData;

    fn nested(&self) -> &ExternalData {
        &self.external
    }

    fn nested_mut(&mut self) -> &mut ExternalData {
        &mut self.external
    }
}

///
/// HostedFile
/// Uploaded file; the url is signed and expires.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HostedFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub file: HostedData,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HostedData {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
}

impl Variant for HostedFile {
    type Root = FileRoot;

    const TAG: Tag = Tag::new("type", "file");
}

impl Nested for HostedFile {
    type Payload = HostedData;

    fn nested(&self) -> &HostedData {
        &self.file
    }

    fn nested_mut(&mut self) -> &mut HostedData {
        &mut self.file
    }
}
