//! Rich text spans.
//!
//! A span carries its shared fields (`plain_text`, `href`, `annotations`)
//! directly; the typed part (`text`, `equation`, `mention`) is resolved
//! through [`RichTextRoot`] and flattened alongside them on the wire.

use crate::{
    core::model::{Adaptive, ComposeArgs, Hierarchy, Nested, Path, RecordError, Tag, Variant},
    schema::{property::DateRange, reference::ObjectRef, user::PartialUser},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest text content the API accepts in one span.
pub const MAX_TEXT_LENGTH: usize = 2000;

///
/// Color
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    GrayBackground,
    BrownBackground,
    OrangeBackground,
    YellowBackground,
    GreenBackground,
    BlueBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
}

///
/// Annotations
/// Style flags for one span.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

impl Annotations {
    /// True when every flag is at its default.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// SPAN CONTENT
// ============================================================================

///
/// RichTextRoot
///

pub enum RichTextRoot {}

impl Path for RichTextRoot {
    const PATH: &'static str = "polydoc::rich_text";
}

impl Hierarchy for RichTextRoot {}

///
/// TextContent
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TextContent {
    pub text: TextData,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TextData {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
}

impl Variant for TextContent {
    type Root = RichTextRoot;

    const TAG: Tag = Tag::new("type", "text");

    /// `(content, href?)`
    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(2)?;

        Ok(Self {
            text: TextData {
                content: args.text(0)?.to_string(),
                link: args.optional_text(1)?.map(|url| Link {
                    url: url.to_string(),
                }),
            },
        })
    }
}

impl Nested for TextContent {
    type Payload = TextData;

    fn nested(&self) -> &TextData {
        &self.text
    }

    fn nested_mut(&mut self) -> &mut TextData {
        &mut self.text
    }
}

///
/// EquationContent
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EquationContent {
    pub equation: EquationData,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EquationData {
    pub expression: String,
}

impl Variant for EquationContent {
    type Root = RichTextRoot;

    const TAG: Tag = Tag::new("type", "equation");

    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(1)?;

        Ok(Self {
            equation: EquationData {
                expression: args.text(0)?.to_string(),
            },
        })
    }
}

///
/// MentionContent
/// Inline reference; the target is itself resolved by `type`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MentionContent {
    pub mention: Adaptive<MentionRoot>,
}

impl Variant for MentionContent {
    type Root = RichTextRoot;

    const TAG: Tag = Tag::new("type", "mention");
}

// ============================================================================
// MENTIONS
// ============================================================================

///
/// MentionRoot
///

pub enum MentionRoot {}

impl Path for MentionRoot {
    const PATH: &'static str = "polydoc::mention";
}

impl Hierarchy for MentionRoot {}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PageMention {
    pub page: ObjectRef,
}

impl Variant for PageMention {
    type Root = MentionRoot;

    const TAG: Tag = Tag::new("type", "page");

    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(1)?;

        Ok(Self {
            page: ObjectRef::parse(args.text(0)?)?,
        })
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DatabaseMention {
    pub database: ObjectRef,
}

impl Variant for DatabaseMention {
    type Root = MentionRoot;

    const TAG: Tag = Tag::new("type", "database");

    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(1)?;

        Ok(Self {
            database: ObjectRef::parse(args.text(0)?)?,
        })
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct UserMention {
    pub user: PartialUser,
}

impl Variant for UserMention {
    type Root = MentionRoot;

    const TAG: Tag = Tag::new("type", "user");
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DateMention {
    pub date: DateRange,
}

impl Variant for DateMention {
    type Root = MentionRoot;

    const TAG: Tag = Tag::new("type", "date");

    /// `(start, end?)`
    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        Ok(Self {
            date: DateRange::compose(&args)?,
        })
    }
}

// ============================================================================
// SPAN
// ============================================================================

///
/// RichText
///
/// One span of rich text. `plain_text` is what the API reports as the
/// rendered text; it is kept in step with the content by the constructors
/// here but is not recomputed on decode.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "Annotations::is_plain")]
    pub annotations: Annotations,

    #[serde(flatten)]
    pub content: Adaptive<RichTextRoot>,
}

impl RichText {
    /// Unstyled text span.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        let content = content.into();

        Self::from_content(
            content.clone(),
            TextContent {
                text: TextData {
                    content,
                    link: None,
                },
            },
        )
    }

    /// Text span linking to `href`.
    #[must_use]
    pub fn link(content: impl Into<String>, href: impl Into<String>) -> Self {
        let content = content.into();
        let href = href.into();

        let mut span = Self::from_content(
            content.clone(),
            TextContent {
                text: TextData {
                    content,
                    link: Some(Link { url: href.clone() }),
                },
            },
        );
        span.href = Some(href);

        span
    }

    #[must_use]
    pub fn equation(expression: impl Into<String>) -> Self {
        let expression = expression.into();

        Self::from_content(
            expression.clone(),
            EquationContent {
                equation: EquationData { expression },
            },
        )
    }

    #[must_use]
    pub fn from_content(
        plain_text: impl Into<String>,
        content: impl Into<Adaptive<RichTextRoot>>,
    ) -> Self {
        Self {
            plain_text: plain_text.into(),
            href: None,
            annotations: Annotations::default(),
            content: content.into(),
        }
    }

    #[must_use]
    pub const fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.content.is::<TextContent>()
    }
}

/// Markdown-ish rendering: links, then style markers from the inside out.
impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = match &self.href {
            None => self.plain_text.clone(),
            Some(href) if self.plain_text.is_empty() => format!("({href})"),
            Some(href) => format!("[{}]({href})", self.plain_text),
        };

        let style = &self.annotations;
        for (on, marker) in [
            (style.bold, "*"),
            (style.italic, "**"),
            (style.underline, "_"),
            (style.strikethrough, "~"),
            (style.code, "`"),
        ] {
            if on {
                text = format!("{marker}{text}{marker}");
            }
        }

        f.write_str(&text)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Split `text` into unstyled spans of at most [`MAX_TEXT_LENGTH`] characters.
#[must_use]
pub fn rich_text(text: &str) -> Vec<RichText> {
    let chars: Vec<char> = text.chars().collect();

    chars
        .chunks(MAX_TEXT_LENGTH)
        .map(|chunk| RichText::text(chunk.iter().collect::<String>()))
        .collect()
}

/// Spans built from every text argument, in order.
pub fn rich_text_args(args: &ComposeArgs) -> Result<Vec<RichText>, RecordError> {
    let mut spans = Vec::new();
    for index in 0..args.len() {
        spans.extend(rich_text(args.text(index)?));
    }

    Ok(spans)
}

/// Concatenated plain text of `spans`.
#[must_use]
pub fn plain_text(spans: &[RichText]) -> String {
    spans.iter().map(|span| span.plain_text.as_str()).collect()
}

/// Concatenated markdown rendering of `spans`.
#[must_use]
pub fn markdown(spans: &[RichText]) -> String {
    spans.iter().map(ToString::to_string).collect()
}
