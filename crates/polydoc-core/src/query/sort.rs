use crate::query::filter::TimestampKind;
use serde::{Deserialize, Serialize};

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

///
/// Sort
/// One sort key; later keys break ties of earlier ones.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Sort {
    Property {
        property: String,
        direction: SortDirection,
    },
    Timestamp {
        timestamp: TimestampKind,
        direction: SortDirection,
    },
}

impl Sort {
    #[must_use]
    pub fn ascending(property: impl Into<String>) -> Self {
        Self::Property {
            property: property.into(),
            direction: SortDirection::Ascending,
        }
    }

    #[must_use]
    pub fn descending(property: impl Into<String>) -> Self {
        Self::Property {
            property: property.into(),
            direction: SortDirection::Descending,
        }
    }

    #[must_use]
    pub const fn by_timestamp(timestamp: TimestampKind, direction: SortDirection) -> Self {
        Self::Timestamp {
            timestamp,
            direction,
        }
    }

    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        match self {
            Self::Property { direction, .. } | Self::Timestamp { direction, .. } => *direction,
        }
    }
}
