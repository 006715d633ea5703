use crate::{
    error::InternalError,
    model::{
        compose::ComposeArgs,
        record::{RecordError, decode_variant, encode_variant, refresh_variant},
    },
    serialize::JsonObject,
};
use serde::{Serialize, de::DeserializeOwned};
use std::{any::Any, fmt::Debug};

// ============================================================================
// HIERARCHY KINDS
// ============================================================================
//
// These traits describe *where* a concrete shape is registered,
// not what data it carries.
//

///
/// Path
/// Stable name of a hierarchy root, used as the registry key.
///

pub trait Path {
    const PATH: &'static str;
}

///
/// Hierarchy
///
/// Marker for the abstract root of a family of discriminator-selected shapes.
/// Roots are usually uninhabited enums; they only exist at the type level.
///

pub trait Hierarchy: Path + 'static {}

///
/// Tag
/// One discriminator pair, e.g. `type = "paragraph"`.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    pub field: &'static str,
    pub value: &'static str,
}

impl Tag {
    #[must_use]
    pub const fn new(field: &'static str, value: &'static str) -> Self {
        Self { field, value }
    }
}

// ============================================================================
// CONCRETE SHAPES
// ============================================================================

///
/// Variant
///
/// A concrete shape under one hierarchy root.
///
/// ## Semantics
/// - `TAG` selects this type inside `Root` during resolution
/// - `FIXED` lists further constant fields (e.g. `object = "block"`) that are
///   written on every encode and checked on every decode
/// - tag fields are not struct fields, so they cannot be reassigned
/// - serde derives carry the payload; optional fields should skip `None`
///

pub trait Variant:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    type Root: Hierarchy;

    const TAG: Tag;
    const FIXED: &'static [Tag] = &[];

    /// Key of the nested payload object; defaults to the discriminator value.
    #[must_use]
    fn payload_key() -> &'static str {
        Self::TAG.value
    }

    /// Build an instance from natural values (text, numbers, other records).
    ///
    /// Types that do not override this are not composable.
    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        let _ = args;

        Err(RecordError::NotComposable {
            type_name: short_type_name::<Self>(),
        })
    }

    /// Every tag written for this type, discriminator first.
    fn tags() -> impl Iterator<Item = Tag> {
        std::iter::once(Self::TAG).chain(Self::FIXED.iter().copied())
    }
}

///
/// Nested
///
/// Typed access to the payload object stored under the type's own tag value,
/// e.g. a `quote` block keeps its fields under `"quote": { ... }`.
///

pub trait Nested: Variant {
    type Payload;

    fn nested(&self) -> &Self::Payload;

    fn nested_mut(&mut self) -> &mut Self::Payload;
}

// ============================================================================
// TYPE ERASURE
// ============================================================================

///
/// ErasedVariant
///
/// Object-safe view of a `Variant`, held by `Adaptive` and produced by
/// registry decoders. Blanket-implemented for every `Variant`.
///

pub(crate) trait ErasedVariant: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    fn tag(&self) -> Tag;

    fn nested_key(&self) -> &'static str;

    fn encode(&self) -> Result<JsonObject, InternalError>;

    fn merge_partial(&mut self, partial: JsonObject) -> Result<Vec<String>, InternalError>;

    fn clone_box(&self) -> Box<dyn ErasedVariant>;

    fn eq_dyn(&self, other: &dyn ErasedVariant) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Variant> ErasedVariant for T {
    fn type_name(&self) -> &'static str {
        short_type_name::<T>()
    }

    fn tag(&self) -> Tag {
        <T as Variant>::TAG
    }

    fn nested_key(&self) -> &'static str {
        <T as Variant>::payload_key()
    }

    fn encode(&self) -> Result<JsonObject, InternalError> {
        encode_variant(self).map_err(Into::into)
    }

    fn merge_partial(&mut self, partial: JsonObject) -> Result<Vec<String>, InternalError> {
        refresh_variant(self, partial)
    }

    fn clone_box(&self) -> Box<dyn ErasedVariant> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn ErasedVariant) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Decode a raw object into `T` and erase it.
pub(crate) fn decode_erased<T: Variant>(
    raw: JsonObject,
) -> Result<Box<dyn ErasedVariant>, InternalError> {
    let value = decode_variant::<T>(serde_json::Value::Object(raw))?;

    Ok(Box::new(value))
}

/// Compose `T` from natural values and erase it.
pub(crate) fn compose_erased<T: Variant>(
    args: ComposeArgs,
) -> Result<Box<dyn ErasedVariant>, InternalError> {
    let value = T::compose(args)?;

    Ok(Box::new(value))
}

/// Type name without its module path, e.g. `Paragraph` or `Adaptive<BlockRoot>`.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let head_end = full.find('<').unwrap_or(full.len());
    let start = full[..head_end].rfind("::").map_or(0, |idx| idx + 2);

    &full[start..]
}
