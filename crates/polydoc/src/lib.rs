//! ## Crate layout
//! - `core`: the engine; type registry, adaptive records, paginated result
//!   streams, and the query builder.
//! - `error`: the public error type callers match on.
//! - `schema`: concrete shapes for a Notion-style API (rich text, blocks,
//!   parents, users, property values, pages and databases).
//!
//! The `prelude` module carries the vocabulary most callers need.

pub use polydoc_core as core;

pub mod error;
pub mod schema;

pub use error::Error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a registry with every shape in [`schema`] and install it as the
/// process-wide default.
pub fn install_schema() -> Result<std::sync::Arc<crate::core::model::TypeRegistry>, Error> {
    let registry = schema::registry()?;
    let installed = registry.install().map_err(Error::from)?;
    tracing::info!(
        version = VERSION,
        roots = installed.roots().count(),
        "installed document schema"
    );

    Ok(installed)
}

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        core::prelude::*,
        schema::{
            BlockRoot, Database, FileRoot, Page, ParentRoot, PropertyRoot, RecordRoot, RichText,
            RichTextRoot, TextBlock as _, UserRoot,
        },
    };
    pub use serde::{Deserialize, Serialize};
}
