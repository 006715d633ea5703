use crate::{
    error::{ErrorClass, ErrorDetail, ErrorOrigin, InternalError},
    model::{
        compose::{ComposeArg, ComposeArgs},
        registry::{TypeRegistry, active_registry, with_registry},
        variant::{ErasedVariant, Hierarchy, Tag, Variant, short_type_name},
    },
    patch::{is_noop, merge_object},
    serialize::{JsonObject, json_kind, object_from_value},
};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned, de::Error as _,
    ser::Error as _,
};
use serde_json::Value as JsonValue;
use std::{cell::RefCell, fmt, marker::PhantomData, sync::Arc};
use thiserror::Error as ThisError;

thread_local! {
    // First typed failure raised by a nested `Adaptive` decode; serde can only
    // carry strings across its boundary, so the typed error is parked here.
    static NESTED_FAILURE: RefCell<Option<InternalError>> = const { RefCell::new(None) };
}

///
/// RecordError
///
/// Failures while decoding, encoding, composing or inspecting one record.
///

#[derive(Debug, ThisError)]
pub enum RecordError {
    #[error("invalid input for '{type_name}': expected a JSON object, found {found}")]
    InvalidInput {
        type_name: &'static str,
        found: &'static str,
    },

    #[error("tag mismatch for '{type_name}': '{field}' must be '{expected}', found {found}")]
    TagMismatch {
        type_name: &'static str,
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("'{type_name}' does not support composition")]
    NotComposable { type_name: &'static str },

    #[error("invalid compose arguments: {message}")]
    InvalidComposeArgs { message: String },

    #[error("'{type_name}' has no attribute '{field}'")]
    FieldAccess {
        type_name: &'static str,
        field: String,
    },

    #[error("failed to decode '{type_name}': {message}")]
    Decode {
        type_name: &'static str,
        message: String,
    },

    #[error("failed to encode '{type_name}': {message}")]
    Encode {
        type_name: &'static str,
        message: String,
    },
}

impl RecordError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidInput { .. }
            | Self::TagMismatch { .. }
            | Self::InvalidComposeArgs { .. }
            | Self::Decode { .. } => ErrorClass::InvalidInput,
            Self::NotComposable { .. } => ErrorClass::Unsupported,
            Self::FieldAccess { .. } => ErrorClass::NotFound,
            Self::Encode { .. } => ErrorClass::Internal,
        }
    }
}

impl From<RecordError> for InternalError {
    fn from(err: RecordError) -> Self {
        Self::with_detail(err.class(), ErrorOrigin::Record, ErrorDetail::Record(err))
    }
}

// ============================================================================
// VARIANT CODEC
// ============================================================================

/// Encode a concrete variant, injecting its tag fields.
pub fn encode_variant<T: Variant>(value: &T) -> Result<JsonObject, RecordError> {
    let mut object = object_from_value(value).map_err(|err| RecordError::Encode {
        type_name: short_type_name::<T>(),
        message: err.to_string(),
    })?;

    for tag in T::tags() {
        object.insert(tag.field.to_string(), JsonValue::from(tag.value));
    }

    Ok(object)
}

/// Decode a raw JSON value into the concrete variant `T`.
///
/// Tag keys that are present must carry `T`'s own values; absent tag keys are
/// accepted because they are fixed by the type. Nested `Adaptive` fields are
/// resolved through the active registry.
pub fn decode_variant<T: Variant>(raw: JsonValue) -> Result<T, InternalError> {
    let type_name = short_type_name::<T>();
    let object = expect_object(raw, type_name)?;
    check_tags::<T>(&object)?;

    decode_typed(JsonValue::Object(object))
}

/// Decode any serde type, surfacing the typed error of the first nested
/// `Adaptive` that failed instead of serde's flattened message.
pub fn decode_typed<T: DeserializeOwned>(raw: JsonValue) -> Result<T, InternalError> {
    clear_nested_failure();
    match serde_json::from_value::<T>(raw) {
        Ok(value) => {
            clear_nested_failure();
            Ok(value)
        }
        Err(err) => Err(take_nested_failure().unwrap_or_else(|| {
            RecordError::Decode {
                type_name: short_type_name::<T>(),
                message: err.to_string(),
            }
            .into()
        })),
    }
}

/// Merge the keys present in `partial` into `target`, leaving every other
/// field untouched. The merged record is re-validated before it replaces
/// `target`; on failure `target` is unchanged.
pub(crate) fn refresh_variant<T: Variant>(
    target: &mut T,
    partial: JsonObject,
) -> Result<Vec<String>, InternalError> {
    let type_name = short_type_name::<T>();
    let tags: Vec<Tag> = T::tags().collect();

    let mut current = encode_variant(target)?;
    if is_noop(&current, &partial) {
        return Ok(Vec::new());
    }

    let applied = merge_object(&mut current, partial, &tags)?;
    let merged = decode_variant::<T>(JsonValue::Object(current))?;

    tracing::debug!(type_name, fields = ?applied, "refreshed record");
    *target = merged;

    Ok(applied)
}

/// Compose `T` from one natural value; list values are spread.
pub fn compose<T: Variant>(value: impl Into<ComposeArg>) -> Result<T, InternalError> {
    T::compose(ComposeArgs::from_value(value)).map_err(Into::into)
}

fn expect_object(raw: JsonValue, type_name: &'static str) -> Result<JsonObject, RecordError> {
    match raw {
        JsonValue::Object(object) => Ok(object),
        other => Err(RecordError::InvalidInput {
            type_name,
            found: json_kind(&other),
        }),
    }
}

fn check_tags<T: Variant>(object: &JsonObject) -> Result<(), RecordError> {
    for tag in T::tags() {
        match object.get(tag.field) {
            None => {}
            Some(JsonValue::String(found)) if found == tag.value => {}
            Some(found) => {
                return Err(RecordError::TagMismatch {
                    type_name: short_type_name::<T>(),
                    field: tag.field,
                    expected: tag.value,
                    found: found.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn payload_of(
    mut object: JsonObject,
    type_name: &'static str,
    key: &'static str,
) -> Result<JsonValue, RecordError> {
    match object.remove(key) {
        Some(JsonValue::Null) | None => Err(RecordError::FieldAccess {
            type_name,
            field: key.to_string(),
        }),
        Some(payload) => Ok(payload),
    }
}

fn payload_field_of(
    payload: JsonValue,
    type_name: &'static str,
    key: &'static str,
    name: &str,
) -> Result<JsonValue, RecordError> {
    let JsonValue::Object(mut nested) = payload else {
        return Err(RecordError::FieldAccess {
            type_name,
            field: format!("{key}.{name}"),
        });
    };

    nested.remove(name).ok_or_else(|| RecordError::FieldAccess {
        type_name,
        field: format!("{key}.{name}"),
    })
}

fn clear_nested_failure() {
    NESTED_FAILURE.with_borrow_mut(|slot| *slot = None);
}

fn stash_nested_failure(err: InternalError) {
    NESTED_FAILURE.with_borrow_mut(|slot| {
        if slot.is_none() {
            *slot = Some(err);
        }
    });
}

fn take_nested_failure() -> Option<InternalError> {
    NESTED_FAILURE.with_borrow_mut(Option::take)
}

///
/// VariantExt
///
/// Serialize / deserialize / refresh / payload access for concrete variants.
/// Blanket-implemented; bring it into scope to use the methods.
///

pub trait VariantExt: Variant {
    fn from_value(raw: JsonValue) -> Result<Self, InternalError> {
        decode_variant(raw)
    }

    fn from_json_str(text: &str) -> Result<Self, InternalError> {
        let raw: JsonValue = crate::serialize::deserialize(text)?;

        decode_variant(raw)
    }

    /// Build from natural values, e.g. `Heading::compose_from("My Title")`.
    fn compose_from(value: impl Into<ComposeArg>) -> Result<Self, InternalError> {
        compose(value)
    }

    fn to_object(&self) -> Result<JsonObject, InternalError> {
        encode_variant(self).map_err(Into::into)
    }

    fn to_value(&self) -> Result<JsonValue, InternalError> {
        self.to_object().map(JsonValue::Object)
    }

    fn to_json_string(&self) -> Result<String, InternalError> {
        let object = self.to_object()?;

        crate::serialize::serialize(&object).map_err(Into::into)
    }

    fn refresh(&mut self, partial: JsonValue) -> Result<(), InternalError> {
        let partial = expect_object(partial, short_type_name::<Self>())?;

        refresh_variant(self, partial).map(|_| ())
    }

    fn payload(&self) -> Result<JsonValue, InternalError> {
        let object = self.to_object()?;

        payload_of(object, short_type_name::<Self>(), Self::payload_key()).map_err(Into::into)
    }

    fn payload_field(&self, name: &str) -> Result<JsonValue, InternalError> {
        let payload = self.payload()?;

        payload_field_of(payload, short_type_name::<Self>(), Self::payload_key(), name)
            .map_err(Into::into)
    }
}

impl<T: Variant> VariantExt for T {}

// ============================================================================
// ADAPTIVE
// ============================================================================

///
/// Adaptive
///
/// A record of hierarchy `H` whose concrete type was chosen at runtime from
/// its discriminator fields. Decoding goes through the active `TypeRegistry`;
/// encoding goes through the concrete variant.
///

pub struct Adaptive<H: Hierarchy> {
    inner: Box<dyn ErasedVariant>,
    _root: PhantomData<fn() -> H>,
}

impl<H: Hierarchy> Adaptive<H> {
    /// Wrap a concrete variant of this hierarchy.
    #[must_use]
    pub fn new<T: Variant<Root = H>>(value: T) -> Self {
        Self::from_erased(Box::new(value))
    }

    pub(crate) fn from_erased(inner: Box<dyn ErasedVariant>) -> Self {
        Self {
            inner,
            _root: PhantomData,
        }
    }

    pub(crate) fn into_erased(self) -> Box<dyn ErasedVariant> {
        self.inner
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Adapt any supported input: an existing record is returned unchanged,
    /// a concrete variant is wrapped, raw JSON is resolved and decoded.
    pub fn parse(input: impl IntoAdaptive<H>) -> Result<Self, InternalError> {
        input.into_adaptive()
    }

    /// Resolve and decode raw JSON through the active registry.
    pub fn from_value(raw: JsonValue) -> Result<Self, InternalError> {
        let object = expect_object(raw, H::PATH)?;
        let registry = active_registry()?;
        let entry = registry.resolve(H::PATH, &object)?;

        tracing::trace!(
            root = H::PATH,
            variant = entry.type_name(),
            "decoding adaptive record"
        );

        entry.decode(object).map(Self::from_erased)
    }

    /// Resolve and decode raw JSON through an explicit registry.
    pub fn from_value_in(registry: &Arc<TypeRegistry>, raw: JsonValue) -> Result<Self, InternalError> {
        with_registry(registry, || Self::from_value(raw))
    }

    pub fn from_json_str(text: &str) -> Result<Self, InternalError> {
        let raw: JsonValue = crate::serialize::deserialize(text)?;

        Self::from_value(raw)
    }

    /// Compose the variant registered under discriminator `value` from one
    /// natural value (lists are spread into positional arguments).
    pub fn compose(value: &str, arg: impl Into<ComposeArg>) -> Result<Self, InternalError> {
        let registry = active_registry()?;
        let entry = registry.find(H::PATH, value)?;

        entry
            .compose(ComposeArgs::from_value(arg))
            .map(Self::from_erased)
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        self.inner.type_name()
    }

    #[must_use]
    pub fn tag(&self) -> Tag {
        self.inner.tag()
    }

    #[must_use]
    pub fn is<T: Variant>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: Variant>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Variant>(&mut self) -> Option<&mut T> {
        self.inner.as_any_mut().downcast_mut::<T>()
    }

    /// Take the concrete variant out, or get `self` back if it is another type.
    pub fn into_variant<T: Variant>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }

        match self.inner.into_any().downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("variant type checked above"),
        }
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    pub fn to_object(&self) -> Result<JsonObject, InternalError> {
        self.inner.encode()
    }

    pub fn to_value(&self) -> Result<JsonValue, InternalError> {
        self.to_object().map(JsonValue::Object)
    }

    pub fn to_json_string(&self) -> Result<String, InternalError> {
        let object = self.to_object()?;

        crate::serialize::serialize(&object).map_err(Into::into)
    }

    // ------------------------------------------------------------------
    // Merge & nested access
    // ------------------------------------------------------------------

    /// Overwrite only the fields present in `partial`.
    pub fn refresh(&mut self, partial: JsonValue) -> Result<(), InternalError> {
        let partial = expect_object(partial, self.variant_name())?;

        self.inner.merge_partial(partial).map(|_| ())
    }

    /// The nested object stored under the record's own tag value.
    pub fn payload(&self) -> Result<JsonValue, InternalError> {
        let object = self.to_object()?;

        payload_of(object, self.variant_name(), self.inner.nested_key()).map_err(Into::into)
    }

    /// One attribute of the nested payload object.
    pub fn payload_field(&self, name: &str) -> Result<JsonValue, InternalError> {
        let payload = self.payload()?;

        payload_field_of(payload, self.variant_name(), self.inner.nested_key(), name)
            .map_err(Into::into)
    }
}

impl<H: Hierarchy> Clone for Adaptive<H> {
    fn clone(&self) -> Self {
        Self::from_erased(self.inner.clone_box())
    }
}

impl<H: Hierarchy> fmt::Debug for Adaptive<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adaptive")
            .field("root", &H::PATH)
            .field("variant", &self.inner)
            .finish()
    }
}

impl<H: Hierarchy> PartialEq for Adaptive<H> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_dyn(other.inner.as_ref())
    }
}

impl<H: Hierarchy, T: Variant<Root = H>> From<T> for Adaptive<H> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<H: Hierarchy> Serialize for Adaptive<H> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let object = self
            .inner
            .encode()
            .map_err(|err| S::Error::custom(err.message))?;

        object.serialize(serializer)
    }
}

impl<'de, H: Hierarchy> Deserialize<'de> for Adaptive<H> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;

        Self::from_value(raw).map_err(|err| {
            let message = err.message.clone();
            stash_nested_failure(err);

            D::Error::custom(message)
        })
    }
}

///
/// IntoAdaptive
/// Inputs accepted by `Adaptive::parse`.
///

pub trait IntoAdaptive<H: Hierarchy> {
    fn into_adaptive(self) -> Result<Adaptive<H>, InternalError>;
}

impl<H: Hierarchy> IntoAdaptive<H> for Adaptive<H> {
    fn into_adaptive(self) -> Result<Adaptive<H>, InternalError> {
        Ok(self)
    }
}

impl<H: Hierarchy> IntoAdaptive<H> for JsonValue {
    fn into_adaptive(self) -> Result<Adaptive<H>, InternalError> {
        Adaptive::from_value(self)
    }
}

impl<H: Hierarchy> IntoAdaptive<H> for JsonObject {
    fn into_adaptive(self) -> Result<Adaptive<H>, InternalError> {
        Adaptive::from_value(JsonValue::Object(self))
    }
}

impl<H: Hierarchy> IntoAdaptive<H> for &str {
    fn into_adaptive(self) -> Result<Adaptive<H>, InternalError> {
        Adaptive::from_json_str(self)
    }
}

impl<H: Hierarchy, T: Variant<Root = H>> IntoAdaptive<H> for T {
    fn into_adaptive(self) -> Result<Adaptive<H>, InternalError> {
        Ok(Adaptive::new(self))
    }
}

#[cfg(test)]
mod tests;
