//! Database query construction and execution.
//!
//! `QueryBuilder` assembles a wire-shaped `Query` (filter tree, sorts,
//! cursor, page size) and hands it to a `PaginatedStream` on execute.

mod builder;
mod condition;
mod filter;
mod result;
mod sort;

#[cfg(test)]
mod tests;

use crate::error::{ErrorClass, ErrorDetail, ErrorOrigin, InternalError};
use thiserror::Error as ThisError;

pub use builder::{Query, QueryBuilder};
pub use condition::{
    CheckboxCondition, Condition, DateCondition, FilesCondition, FormulaCondition,
    MultiSelectCondition, NumberCondition, PeopleCondition, RelationCondition, RelativeDate,
    SelectCondition, TextCondition,
};
pub use filter::{
    CompoundFilter, Filter, PropertyFilter, SearchFilter, TimestampFilter, TimestampKind,
};
pub use result::ResultSet;
pub use sort::{Sort, SortDirection};

///
/// QueryError
///

#[derive(Debug, ThisError)]
pub enum QueryError {
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: &'static str, message: String },

    #[error("'{op}' filter requires at least one child")]
    EmptyCompound { op: &'static str },

    #[error("condition on '{target}' sets no operator")]
    EmptyCondition { target: String },
}

impl QueryError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidArgument { .. }
            | Self::EmptyCompound { .. }
            | Self::EmptyCondition { .. } => ErrorClass::InvalidInput,
        }
    }
}

impl From<QueryError> for InternalError {
    fn from(err: QueryError) -> Self {
        Self::with_detail(err.class(), ErrorOrigin::Query, ErrorDetail::Query(err))
    }
}
