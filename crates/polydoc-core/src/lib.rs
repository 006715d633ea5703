//! Core runtime for polydoc: the type registry, adaptive records, paginated
//! result streams, and the query builder, plus the ergonomics exported via
//! the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod model;
pub mod obs;
pub mod patch;
pub mod query;
pub mod serialize;
pub mod stream;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, serializers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{
            Adaptive, ComposeArg, ComposeArgs, Hierarchy, Nested, Path, Tag, TypeRegistry,
            Variant, VariantExt,
        },
        query::{Condition, Filter, QueryBuilder, Sort, SortDirection},
        stream::{PageRequest, PageSource, PaginatedStream, ResultPage},
    };
}
