//! Typed per-property-kind filter conditions.
//!
//! Every condition is an object of optional `operator: value` pairs; unset
//! operators are omitted from the wire body. A condition with no operator set
//! is blank and rejected when the filter is added to a query.

use crate::serialize::JsonObject;
use serde::{Deserialize, Serialize};

/// Generates the blank check and a chaining setter per operator; `+ emptiness`
/// adds `empty()` / `not_empty()` for the `is_empty` / `is_not_empty` flags.
macro_rules! condition_ops {
    ($ty:ident + emptiness { $($op:ident: $val:ty),* $(,)? }) => {
        condition_ops!($ty { $($op: $val),* });

        impl $ty {
            #[must_use]
            pub const fn empty(mut self) -> Self {
                self.is_empty = Some(true);
                self
            }

            #[must_use]
            pub const fn not_empty(mut self) -> Self {
                self.is_not_empty = Some(true);
                self
            }
        }
    };
    ($ty:ident { $($op:ident: $val:ty),* $(,)? }) => {
        impl $ty {
            /// `true` when no operator is set.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                *self == Self::default()
            }

            $(
                #[must_use]
                pub fn $op(mut self, value: impl Into<$val>) -> Self {
                    self.$op = Some(value.into());
                    self
                }
            )*
        }
    };
}

///
/// TextCondition
/// Title, rich text, phone number, email and url properties.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TextCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not_equal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not_contain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_not_empty: Option<bool>,
}

condition_ops!(TextCondition + emptiness {
    equals: String,
    does_not_equal: String,
    contains: String,
    does_not_contain: String,
    starts_with: String,
    ends_with: String,
});

///
/// NumberCondition
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct NumberCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not_equal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less_than: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than_or_equal_to: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less_than_or_equal_to: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_not_empty: Option<bool>,
}

condition_ops!(NumberCondition + emptiness {
    equals: f64,
    does_not_equal: f64,
    greater_than: f64,
    less_than: f64,
    greater_than_or_equal_to: f64,
    less_than_or_equal_to: f64,
});

///
/// CheckboxCondition
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CheckboxCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not_equal: Option<bool>,
}

condition_ops!(CheckboxCondition {
    equals: bool,
    does_not_equal: bool,
});

///
/// SelectCondition
/// Select and status properties.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SelectCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not_equal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_not_empty: Option<bool>,
}

condition_ops!(SelectCondition + emptiness {
    equals: String,
    does_not_equal: String,
});

///
/// MultiSelectCondition
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MultiSelectCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not_contain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_not_empty: Option<bool>,
}

condition_ops!(MultiSelectCondition + emptiness {
    contains: String,
    does_not_contain: String,
});

///
/// DateCondition
///
/// Absolute operators take ISO 8601 dates or datetimes. Relative operators
/// (`past_week`, `next_month`, ...) are sent as empty objects.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DateCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_or_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_or_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_not_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_week: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_month: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_year: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_week: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_month: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_year: Option<JsonObject>,
}

condition_ops!(DateCondition + emptiness {
    equals: String,
    before: String,
    after: String,
    on_or_before: String,
    on_or_after: String,
});

///
/// RelativeDate
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelativeDate {
    PastWeek,
    PastMonth,
    PastYear,
    NextWeek,
    NextMonth,
    NextYear,
}

impl DateCondition {
    /// Set one relative-date operator.
    #[must_use]
    pub fn relative(mut self, window: RelativeDate) -> Self {
        let slot = match window {
            RelativeDate::PastWeek => &mut self.past_week,
            RelativeDate::PastMonth => &mut self.past_month,
            RelativeDate::PastYear => &mut self.past_year,
            RelativeDate::NextWeek => &mut self.next_week,
            RelativeDate::NextMonth => &mut self.next_month,
            RelativeDate::NextYear => &mut self.next_year,
        };
        *slot = Some(JsonObject::new());

        self
    }
}

///
/// PeopleCondition
/// People, created-by and last-edited-by properties; values are user ids.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PeopleCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not_contain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_not_empty: Option<bool>,
}

condition_ops!(PeopleCondition + emptiness {
    contains: String,
    does_not_contain: String,
});

///
/// FilesCondition
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct FilesCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_not_empty: Option<bool>,
}

condition_ops!(FilesCondition + emptiness {
});

///
/// RelationCondition
/// Values are page ids.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RelationCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not_contain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_not_empty: Option<bool>,
}

condition_ops!(RelationCondition + emptiness {
    contains: String,
    does_not_contain: String,
});

///
/// FormulaCondition
/// Condition on a formula result, by result kind.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct FormulaCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<TextCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<CheckboxCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<NumberCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateCondition>,
}

condition_ops!(FormulaCondition {
    string: TextCondition,
    checkbox: CheckboxCondition,
    number: NumberCondition,
    date: DateCondition,
});

///
/// Condition
///
/// One property condition, keyed on the wire by the property kind, e.g.
/// `"rich_text": { "contains": "milk" }`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Title(TextCondition),
    RichText(TextCondition),
    PhoneNumber(TextCondition),
    Email(TextCondition),
    Url(TextCondition),
    Number(NumberCondition),
    Checkbox(CheckboxCondition),
    Select(SelectCondition),
    Status(SelectCondition),
    MultiSelect(MultiSelectCondition),
    Date(DateCondition),
    People(PeopleCondition),
    Files(FilesCondition),
    Relation(RelationCondition),
    Formula(FormulaCondition),
}

impl Condition {
    /// Wire key of this condition kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::RichText(_) => "rich_text",
            Self::PhoneNumber(_) => "phone_number",
            Self::Email(_) => "email",
            Self::Url(_) => "url",
            Self::Number(_) => "number",
            Self::Checkbox(_) => "checkbox",
            Self::Select(_) => "select",
            Self::Status(_) => "status",
            Self::MultiSelect(_) => "multi_select",
            Self::Date(_) => "date",
            Self::People(_) => "people",
            Self::Files(_) => "files",
            Self::Relation(_) => "relation",
            Self::Formula(_) => "formula",
        }
    }

    /// `true` when the wrapped condition sets no operator.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Title(c) | Self::RichText(c) | Self::PhoneNumber(c) | Self::Email(c) | Self::Url(c) => {
                c.is_blank()
            }
            Self::Number(c) => c.is_blank(),
            Self::Checkbox(c) => c.is_blank(),
            Self::Select(c) | Self::Status(c) => c.is_blank(),
            Self::MultiSelect(c) => c.is_blank(),
            Self::Date(c) => c.is_blank(),
            Self::People(c) => c.is_blank(),
            Self::Files(c) => c.is_blank(),
            Self::Relation(c) => c.is_blank(),
            Self::Formula(c) => c.is_blank(),
        }
    }
}
