//! Block shapes.
//!
//! Every block is written with `object = "block"` and selected by `type`;
//! its content lives under a key named after the type, e.g.
//! `{"type": "quote", "quote": {"rich_text": [...]}}`.

use crate::{
    core::model::{Adaptive, ComposeArgs, Hierarchy, Nested, Path, RecordError, Tag, Variant},
    schema::{
        file::{Emoji, FileRoot},
        parent::ParentRoot,
        text::{Color, RichText, markdown, plain_text, rich_text, rich_text_args},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) const BLOCK_OBJECT: Tag = Tag::new("object", "block");

///
/// BlockRoot
///

pub enum BlockRoot {}

impl Path for BlockRoot {
    const PATH: &'static str = "polydoc::block";
}

impl Hierarchy for BlockRoot {}

///
/// BlockMeta
/// Fields shared by every block; absent on blocks built locally.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BlockMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Adaptive<ParentRoot>>,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<String>,
}

///
/// Block
///

pub trait Block: Variant<Root = BlockRoot> {
    fn meta(&self) -> &BlockMeta;

    fn meta_mut(&mut self) -> &mut BlockMeta;
}

///
/// TextData
/// Content of a text block.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TextData {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Adaptive<BlockRoot>>>,
}

impl TextData {
    fn from_args(args: &ComposeArgs) -> Result<Self, RecordError> {
        Ok(Self {
            rich_text: rich_text_args(args)?,
            ..Self::default()
        })
    }
}

///
/// TextBlock
///
/// Blocks whose content is a run of rich text and that may hold children.
///

pub trait TextBlock: Block {
    fn text_data(&self) -> &TextData;

    fn text_data_mut(&mut self) -> &mut TextData;

    #[must_use]
    fn plain_text(&self) -> String {
        plain_text(&self.text_data().rich_text)
    }

    #[must_use]
    fn markdown(&self) -> String {
        markdown(&self.text_data().rich_text)
    }

    /// Append `text` as unstyled spans.
    fn concat(&mut self, text: &str) {
        self.text_data_mut().rich_text.extend(rich_text(text));
    }

    /// Append a child block.
    fn append(&mut self, child: impl Into<Adaptive<BlockRoot>>) {
        self.text_data_mut()
            .children
            .get_or_insert_with(Vec::new)
            .push(child.into());
        self.meta_mut().has_children = true;
    }
}

// ============================================================================
// TEXT BLOCKS
// ============================================================================

// Plain text blocks, composed from one or more text arguments.
macro_rules! text_block {
    ($(#[$attr:meta])* $name:ident, $key:ident) => {
        $(#[$attr])*
        #[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
        pub struct $name {
            #[serde(flatten)]
            pub meta: BlockMeta,
            #[serde(default)]
            pub $key: TextData,
        }

        impl Variant for $name {
            type Root = BlockRoot;

            const TAG: Tag = Tag::new("type", stringify!($key));
            const FIXED: &'static [Tag] = &[BLOCK_OBJECT];

            fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
                Ok(Self {
                    meta: BlockMeta::default(),
                    $key: TextData::from_args(&args)?,
                })
            }
        }

        impl Nested for $name {
            type Payload = TextData;

            fn nested(&self) -> &TextData {
                &self.$key
            }

            fn nested_mut(&mut self) -> &mut TextData {
                &mut self.$key
            }
        }

        impl Block for $name {
            fn meta(&self) -> &BlockMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut BlockMeta {
                &mut self.meta
            }
        }

        impl TextBlock for $name {
            fn text_data(&self) -> &TextData {
                &self.$key
            }

            fn text_data_mut(&mut self) -> &mut TextData {
                &mut self.$key
            }
        }
    };
}

text_block!(Paragraph, paragraph);
text_block!(Heading1, heading_1);
text_block!(Heading2, heading_2);
text_block!(Heading3, heading_3);
text_block!(Quote, quote);
text_block!(BulletedListItem, bulleted_list_item);
text_block!(NumberedListItem, numbered_list_item);
text_block!(Toggle, toggle);

// Block with extra payload fields next to the shared text data.
macro_rules! impl_text_block {
    ($name:ident, $key:ident, $payload:ty) => {
        impl Nested for $name {
            type Payload = $payload;

            fn nested(&self) -> &$payload {
                &self.$key
            }

            fn nested_mut(&mut self) -> &mut $payload {
                &mut self.$key
            }
        }

        impl Block for $name {
            fn meta(&self) -> &BlockMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut BlockMeta {
                &mut self.meta
            }
        }

        impl TextBlock for $name {
            fn text_data(&self) -> &TextData {
                &self.$key.text
            }

            fn text_data_mut(&mut self) -> &mut TextData {
                &mut self.$key.text
            }
        }
    };
}

///
/// ToDo
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ToDo {
    #[serde(flatten)]
    pub meta: BlockMeta,
    #[serde(default)]
    pub to_do: ToDoData,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ToDoData {
    #[serde(flatten)]
    pub text: TextData,
    #[serde(default)]
    pub checked: bool,
}

impl ToDo {
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.to_do.checked
    }
}

impl Variant for ToDo {
    type Root = BlockRoot;

    const TAG: Tag = Tag::new("type", "to_do");
    const FIXED: &'static [Tag] = &[BLOCK_OBJECT];

    /// `(text, checked?, href?)`
    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(3)?;

        let text = args.text(0)?;
        let span = match args.optional_text(2)? {
            Some(href) => RichText::link(text, href),
            None => RichText::text(text),
        };

        Ok(Self {
            meta: BlockMeta::default(),
            to_do: ToDoData {
                text: TextData {
                    rich_text: vec![span],
                    ..TextData::default()
                },
                checked: args.optional_bool(1)?.unwrap_or(false),
            },
        })
    }
}

impl_text_block!(ToDo, to_do, ToDoData);

///
/// Callout
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Callout {
    #[serde(flatten)]
    pub meta: BlockMeta,
    #[serde(default)]
    pub callout: CalloutData,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CalloutData {
    #[serde(flatten)]
    pub text: TextData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Adaptive<FileRoot>>,
}

impl Default for CalloutData {
    fn default() -> Self {
        Self {
            text: TextData {
                color: Color::GrayBackground,
                ..TextData::default()
            },
            icon: None,
        }
    }
}

impl Variant for Callout {
    type Root = BlockRoot;

    const TAG: Tag = Tag::new("type", "callout");
    const FIXED: &'static [Tag] = &[BLOCK_OBJECT];

    /// `(text, emoji?)`
    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(2)?;

        let mut callout = CalloutData::default();
        callout.text.rich_text = rich_text(args.text(0)?);
        callout.icon = args.optional_text(1)?.map(|emoji| {
            Adaptive::new(Emoji {
                emoji: emoji.to_string(),
            })
        });

        Ok(Self {
            meta: BlockMeta::default(),
            callout,
        })
    }
}

impl_text_block!(Callout, callout, CalloutData);

///
/// Code
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Code {
    #[serde(flatten)]
    pub meta: BlockMeta,
    #[serde(default)]
    pub code: CodeData,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CodeData {
    #[serde(flatten)]
    pub text: TextData,
    #[serde(default)]
    pub caption: Vec<RichText>,
    #[serde(default = "plain_text_language")]
    pub language: String,
}

impl Default for CodeData {
    fn default() -> Self {
        Self {
            text: TextData::default(),
            caption: Vec::new(),
            language: plain_text_language(),
        }
    }
}

fn plain_text_language() -> String {
    "plain text".to_string()
}

impl Variant for Code {
    type Root = BlockRoot;

    const TAG: Tag = Tag::new("type", "code");
    const FIXED: &'static [Tag] = &[BLOCK_OBJECT];

    /// `(source, language?)`
    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(2)?;

        let mut code = CodeData::default();
        code.text.rich_text = rich_text(args.text(0)?);
        if let Some(language) = args.optional_text(1)? {
            code.language = language.to_string();
        }

        Ok(Self {
            meta: BlockMeta::default(),
            code,
        })
    }
}

impl_text_block!(Code, code, CodeData);

// ============================================================================
// OTHER BLOCKS
// ============================================================================

///
/// Divider
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Divider {
    #[serde(flatten)]
    pub meta: BlockMeta,
    #[serde(default)]
    pub divider: EmptyData,
}

/// Payload of blocks that carry nothing, written as `{}`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EmptyData {}

impl Variant for Divider {
    type Root = BlockRoot;

    const TAG: Tag = Tag::new("type", "divider");
    const FIXED: &'static [Tag] = &[BLOCK_OBJECT];
}

///
/// Equation
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Equation {
    #[serde(flatten)]
    pub meta: BlockMeta,
    pub equation: EquationData,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EquationData {
    pub expression: String,
}

impl Variant for Equation {
    type Root = BlockRoot;

    const TAG: Tag = Tag::new("type", "equation");
    const FIXED: &'static [Tag] = &[BLOCK_OBJECT];

    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(1)?;

        Ok(Self {
            meta: BlockMeta::default(),
            equation: EquationData {
                expression: args.text(0)?.to_string(),
            },
        })
    }
}

///
/// Bookmark
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Bookmark {
    #[serde(flatten)]
    pub meta: BlockMeta,
    pub bookmark: BookmarkData,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BookmarkData {
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

impl Variant for Bookmark {
    type Root = BlockRoot;

    const TAG: Tag = Tag::new("type", "bookmark");
    const FIXED: &'static [Tag] = &[BLOCK_OBJECT];

    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(1)?;

        Ok(Self {
            meta: BlockMeta::default(),
            bookmark: BookmarkData {
                url: args.text(0)?.to_string(),
                caption: Vec::new(),
            },
        })
    }
}

///
/// ChildPage
/// Read-only pointer to a page nested under a block.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ChildPage {
    #[serde(flatten)]
    pub meta: BlockMeta,
    pub child_page: ChildPageData,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChildPageData {
    pub title: String,
}

impl Variant for ChildPage {
    type Root = BlockRoot;

    const TAG: Tag = Tag::new("type", "child_page");
    const FIXED: &'static [Tag] = &[BLOCK_OBJECT];
}
