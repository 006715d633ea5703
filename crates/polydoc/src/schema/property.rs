//! Page property values, selected by `type`.
//!
//! Each value keeps its data under a key named after its type, e.g.
//! `{"id": "abc", "type": "number", "number": 4}`.

use crate::{
    core::model::{ComposeArgs, Hierarchy, Nested, Path, RecordError, Tag, Variant},
    schema::{
        reference::ObjectRef,
        text::{RichText, plain_text, rich_text_args},
    },
};
use serde::{Deserialize, Serialize};

///
/// PropertyRoot
///

pub enum PropertyRoot {}

impl Path for PropertyRoot {
    const PATH: &'static str = "polydoc::property";
}

impl Hierarchy for PropertyRoot {}

///
/// DateRange
/// ISO dates or datetimes, kept as text.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DateRange {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl DateRange {
    /// `(start, end?)`
    pub(crate) fn compose(args: &ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(2)?;

        Ok(Self {
            start: args.text(0)?.to_string(),
            end: args.optional_text(1)?.map(str::to_string),
            time_zone: None,
        })
    }

    #[must_use]
    pub const fn is_range(&self) -> bool {
        self.end.is_some()
    }
}

///
/// SelectOption
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SelectOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SelectOption {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: None,
        }
    }
}

// Property value whose data sits under its type key; `$compose` builds the
// data from the composer arguments.
macro_rules! property_value {
    (
        $(#[$attr:meta])*
        $name:ident, $key:ident: $ty:ty,
        |$args:ident| $compose:expr
    ) => {
        $(#[$attr])*
        #[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
        pub struct $name {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub id: Option<String>,
            #[serde(default)]
            pub $key: $ty,
        }

        impl Variant for $name {
            type Root = PropertyRoot;

            const TAG: Tag = Tag::new("type", stringify!($key));

            fn compose($args: ComposeArgs) -> Result<Self, RecordError> {
                let value: $ty = $compose;

                Ok(Self {
                    id: None,
                    $key: value,
                })
            }
        }

        impl Nested for $name {
            type Payload = $ty;

            fn nested(&self) -> &$ty {
                &self.$key
            }

            fn nested_mut(&mut self) -> &mut $ty {
                &mut self.$key
            }
        }
    };
}

property_value!(
    ///
    /// TitleValue
    ///
    TitleValue, title: Vec<RichText>,
    |args| rich_text_args(&args)?
);

property_value!(
    ///
    /// RichTextValue
    ///
    RichTextValue, rich_text: Vec<RichText>,
    |args| rich_text_args(&args)?
);

property_value!(
    ///
    /// NumberValue
    ///
    NumberValue, number: Option<f64>,
    |args| {
        args.expect_at_most(1)?;
        Some(args.number(0)?)
    }
);

property_value!(
    ///
    /// CheckboxValue
    ///
    CheckboxValue, checkbox: bool,
    |args| {
        args.expect_at_most(1)?;
        args.bool(0)?
    }
);

property_value!(
    ///
    /// SelectValue
    ///
    SelectValue, select: Option<SelectOption>,
    |args| {
        args.expect_at_most(1)?;
        Some(SelectOption::named(args.text(0)?))
    }
);

property_value!(
    ///
    /// StatusValue
    ///
    StatusValue, status: Option<SelectOption>,
    |args| {
        args.expect_at_most(1)?;
        Some(SelectOption::named(args.text(0)?))
    }
);

property_value!(
    ///
    /// MultiSelectValue
    ///
    MultiSelectValue, multi_select: Vec<SelectOption>,
    |args| {
        (0..args.len())
            .map(|index| args.text(index).map(SelectOption::named))
            .collect::<Result<_, _>>()?
    }
);

property_value!(
    ///
    /// DateValue
    ///
    DateValue, date: Option<DateRange>,
    |args| Some(DateRange::compose(&args)?)
);

property_value!(
    ///
    /// UrlValue
    ///
    UrlValue, url: Option<String>,
    |args| {
        args.expect_at_most(1)?;
        Some(args.text(0)?.to_string())
    }
);

property_value!(
    ///
    /// EmailValue
    ///
    EmailValue, email: Option<String>,
    |args| {
        args.expect_at_most(1)?;
        Some(args.text(0)?.to_string())
    }
);

property_value!(
    ///
    /// PhoneNumberValue
    ///
    PhoneNumberValue, phone_number: Option<String>,
    |args| {
        args.expect_at_most(1)?;
        Some(args.text(0)?.to_string())
    }
);

property_value!(
    ///
    /// RelationValue
    /// Composed from ids or links to the related pages.
    ///
    RelationValue, relation: Vec<ObjectRef>,
    |args| {
        (0..args.len())
            .map(|index| args.text(index).and_then(ObjectRef::parse))
            .collect::<Result<_, _>>()?
    }
);

impl TitleValue {
    #[must_use]
    pub fn plain_text(&self) -> String {
        plain_text(&self.title)
    }
}

impl RichTextValue {
    #[must_use]
    pub fn plain_text(&self) -> String {
        plain_text(&self.rich_text)
    }
}

impl MultiSelectValue {
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.multi_select.iter().any(|option| option.name == name)
    }
}
