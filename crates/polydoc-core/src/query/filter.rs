use crate::query::{
    QueryError,
    condition::{Condition, DateCondition},
};
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr};

///
/// Filter AST
///
/// Wire-shaped filter tree sent with database queries. Leaves are
/// property, timestamp or search filters; interior nodes are AND / OR
/// compounds. The tree carries no schema knowledge: property names and
/// condition kinds are checked by the remote API.
///

///
/// PropertyFilter
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    #[serde(flatten)]
    pub condition: Condition,
}

///
/// TimestampKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampKind {
    CreatedTime,
    LastEditedTime,
}

///
/// TimestampFilter
/// Wire form: `{"timestamp": "created_time", "created_time": {...}}`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "timestamp", rename_all = "snake_case")]
pub enum TimestampFilter {
    CreatedTime { created_time: DateCondition },
    LastEditedTime { last_edited_time: DateCondition },
}

impl TimestampFilter {
    #[must_use]
    pub const fn new(kind: TimestampKind, condition: DateCondition) -> Self {
        match kind {
            TimestampKind::CreatedTime => Self::CreatedTime {
                created_time: condition,
            },
            TimestampKind::LastEditedTime => Self::LastEditedTime {
                last_edited_time: condition,
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TimestampKind {
        match self {
            Self::CreatedTime { .. } => TimestampKind::CreatedTime,
            Self::LastEditedTime { .. } => TimestampKind::LastEditedTime,
        }
    }

    #[must_use]
    pub const fn condition(&self) -> &DateCondition {
        match self {
            Self::CreatedTime { created_time } => created_time,
            Self::LastEditedTime { last_edited_time } => last_edited_time,
        }
    }
}

///
/// SearchFilter
/// Filter accepted by the search endpoint, e.g. `object = page`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SearchFilter {
    pub property: String,
    pub value: String,
}

///
/// CompoundFilter
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundFilter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl CompoundFilter {
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::And(_) => "and",
            Self::Or(_) => "or",
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Filter] {
        match self {
            Self::And(children) | Self::Or(children) => children,
        }
    }
}

///
/// Filter
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    Compound(CompoundFilter),
    Timestamp(TimestampFilter),
    Property(PropertyFilter),
    Search(SearchFilter),
}

impl Filter {
    #[must_use]
    pub fn property(name: impl Into<String>, condition: Condition) -> Self {
        Self::Property(PropertyFilter {
            property: name.into(),
            condition,
        })
    }

    #[must_use]
    pub const fn timestamp(kind: TimestampKind, condition: DateCondition) -> Self {
        Self::Timestamp(TimestampFilter::new(kind, condition))
    }

    #[must_use]
    pub fn search(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Search(SearchFilter {
            property: property.into(),
            value: value.into(),
        })
    }

    /// AND of `children`; an empty list is rejected.
    pub fn and(children: Vec<Self>) -> Result<Self, QueryError> {
        if children.is_empty() {
            return Err(QueryError::EmptyCompound { op: "and" });
        }

        Ok(Self::Compound(CompoundFilter::And(children)))
    }

    /// OR of `children`; an empty list is rejected.
    pub fn or(children: Vec<Self>) -> Result<Self, QueryError> {
        if children.is_empty() {
            return Err(QueryError::EmptyCompound { op: "or" });
        }

        Ok(Self::Compound(CompoundFilter::Or(children)))
    }

    /// AND `other` onto this filter, appending when this is already an AND.
    #[must_use]
    pub fn and_with(self, other: Self) -> Self {
        match self {
            Self::Compound(CompoundFilter::And(mut children)) => {
                children.push(other);
                Self::Compound(CompoundFilter::And(children))
            }
            existing => Self::Compound(CompoundFilter::And(vec![existing, other])),
        }
    }

    /// Check that every compound has children and every condition sets an
    /// operator.
    pub fn validate(&self) -> Result<(), QueryError> {
        match self {
            Self::Compound(compound) => {
                if compound.children().is_empty() {
                    return Err(QueryError::EmptyCompound { op: compound.op() });
                }

                compound.children().iter().try_for_each(Self::validate)
            }
            Self::Property(filter) if filter.condition.is_blank() => {
                Err(QueryError::EmptyCondition {
                    target: filter.property.clone(),
                })
            }
            Self::Timestamp(filter) if filter.condition().is_blank() => {
                Err(QueryError::EmptyCondition {
                    target: match filter.kind() {
                        TimestampKind::CreatedTime => "created_time".to_string(),
                        TimestampKind::LastEditedTime => "last_edited_time".to_string(),
                    },
                })
            }
            Self::Property(_) | Self::Timestamp(_) | Self::Search(_) => Ok(()),
        }
    }

    /// Number of leaf filters in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Compound(compound) => compound.children().iter().map(Self::leaf_count).sum(),
            Self::Property(_) | Self::Timestamp(_) | Self::Search(_) => 1,
        }
    }
}

impl From<PropertyFilter> for Filter {
    fn from(filter: PropertyFilter) -> Self {
        Self::Property(filter)
    }
}

impl From<TimestampFilter> for Filter {
    fn from(filter: TimestampFilter) -> Self {
        Self::Timestamp(filter)
    }
}

impl From<SearchFilter> for Filter {
    fn from(filter: SearchFilter) -> Self {
        Self::Search(filter)
    }
}

impl BitAnd for Filter {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and_with(rhs)
    }
}

impl BitOr for Filter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match self {
            Self::Compound(CompoundFilter::Or(mut children)) => {
                children.push(rhs);
                Self::Compound(CompoundFilter::Or(children))
            }
            existing => Self::Compound(CompoundFilter::Or(vec![existing, rhs])),
        }
    }
}
