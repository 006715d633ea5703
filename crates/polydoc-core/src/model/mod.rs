//! Runtime object model.
//!
//! A *hierarchy* is an abstract root (`Hierarchy`) with any number of
//! concrete shapes (`Variant`) selected by discriminator fields. The
//! `TypeRegistry` maps discriminator values to shapes, and `Adaptive<H>`
//! holds whichever shape a payload resolved to.
//!
//! In general:
//! - `variant` defines *what a shape is*
//! - `registry` defines *which shape a payload becomes*
//! - `record` defines *how payloads become shapes and back*

pub mod compose;
pub mod record;
pub mod registry;
pub mod variant;

pub use compose::{ComposeArg, ComposeArgs};
pub use record::{
    Adaptive, IntoAdaptive, RecordError, VariantExt, compose, decode_typed, decode_variant,
    encode_variant,
};
pub use registry::{RegistryError, TypeRegistry, VariantEntry, active_registry, with_registry};
pub use variant::{Hierarchy, Nested, Path, Tag, Variant, short_type_name};
