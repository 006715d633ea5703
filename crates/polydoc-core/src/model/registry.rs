use crate::{
    error::{ErrorClass, ErrorDetail, ErrorOrigin, InternalError},
    model::{
        compose::ComposeArgs,
        record::{Adaptive, RecordError},
        variant::{
            ErasedVariant, Hierarchy, Path, Variant, compose_erased, decode_erased, short_type_name,
        },
    },
    serialize::JsonObject,
};
use serde_json::Value as JsonValue;
use std::{
    any::TypeId,
    cell::RefCell,
    collections::BTreeMap,
    sync::{Arc, OnceLock},
};
use thiserror::Error as ThisError;

static GLOBAL_REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

thread_local! {
    static REGISTRY_OVERRIDE: RefCell<Option<Arc<TypeRegistry>>> = const { RefCell::new(None) };
}

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("{}", unknown_message(.root, .field.as_deref(), .value.as_deref()))]
    UnknownDiscriminator {
        root: String,
        field: Option<String>,
        value: Option<String>,
    },

    #[error(
        "discriminator {root}.{field} = '{value}' is already bound to '{existing}', cannot bind '{requested}'"
    )]
    DuplicateDiscriminator {
        root: &'static str,
        field: &'static str,
        value: &'static str,
        existing: &'static str,
        requested: &'static str,
    },

    #[error("no type registry installed")]
    RegistryUnavailable,

    #[error("type registry already installed")]
    AlreadyInstalled,
}

impl RegistryError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownDiscriminator { .. } => ErrorClass::InvalidInput,
            Self::DuplicateDiscriminator { .. } | Self::AlreadyInstalled => ErrorClass::Conflict,
            Self::RegistryUnavailable => ErrorClass::Internal,
        }
    }

    fn unknown(root: &str, field: Option<&str>, value: Option<&str>) -> Self {
        Self::UnknownDiscriminator {
            root: root.to_string(),
            field: field.map(str::to_string),
            value: value.map(str::to_string),
        }
    }
}

impl From<RegistryError> for InternalError {
    fn from(err: RegistryError) -> Self {
        Self::with_detail(
            err.class(),
            ErrorOrigin::Registry,
            ErrorDetail::Registry(err),
        )
    }
}

fn unknown_message(root: &str, field: Option<&str>, value: Option<&str>) -> String {
    match (field, value) {
        (Some(field), Some(value)) => {
            format!("unknown discriminator for '{root}': {field} = '{value}'")
        }
        (Some(field), None) => {
            format!("unknown discriminator for '{root}': {field} is not a string")
        }
        (None, Some(value)) => format!("no variant of '{root}' is registered as '{value}'"),
        (None, None) => format!("no discriminator for '{root}' present in input"),
    }
}

///
/// VariantEntry
///
/// What a registry knows about one concrete type: its identity plus the
/// erased decode / compose functions used to build it.
///

#[derive(Clone, Copy, Debug)]
pub struct VariantEntry {
    type_id: TypeId,
    type_name: &'static str,
    decode: fn(JsonObject) -> Result<Box<dyn ErasedVariant>, InternalError>,
    compose: fn(ComposeArgs) -> Result<Box<dyn ErasedVariant>, InternalError>,
}

impl VariantEntry {
    /// Entry for a concrete variant type.
    #[must_use]
    pub fn of<T: Variant>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: short_type_name::<T>(),
            decode: decode_erased::<T>,
            compose: compose_erased::<T>,
        }
    }

    /// Entry that resolves the input again inside hierarchy `H`.
    #[must_use]
    pub fn delegate<H: Hierarchy>() -> Self {
        Self {
            type_id: TypeId::of::<Adaptive<H>>(),
            type_name: H::PATH,
            decode: decode_delegate::<H>,
            compose: compose_delegate::<H>,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn variant_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn decode(&self, raw: JsonObject) -> Result<Box<dyn ErasedVariant>, InternalError> {
        (self.decode)(raw)
    }

    pub(crate) fn compose(&self, args: ComposeArgs) -> Result<Box<dyn ErasedVariant>, InternalError> {
        (self.compose)(args)
    }
}

fn decode_delegate<H: Hierarchy>(raw: JsonObject) -> Result<Box<dyn ErasedVariant>, InternalError> {
    Adaptive::<H>::from_value(JsonValue::Object(raw)).map(Adaptive::into_erased)
}

fn compose_delegate<H: Hierarchy>(
    args: ComposeArgs,
) -> Result<Box<dyn ErasedVariant>, InternalError> {
    let _ = args;

    Err(RecordError::NotComposable { type_name: H::PATH }.into())
}

///
/// DiscriminatorField
/// One discriminator key of a root and the values registered under it.
///

#[derive(Debug, Default)]
struct DiscriminatorField {
    name: &'static str,
    variants: BTreeMap<&'static str, VariantEntry>,
}

///
/// TypeRegistry
///
/// Maps (hierarchy root, discriminator field, discriminator value) to the
/// concrete type that decodes it.
///
/// Fields of one root are consulted in the order they were first registered;
/// the first field present in the input decides.
///

#[derive(Debug, Default)]
pub struct TypeRegistry {
    roots: BTreeMap<&'static str, Vec<DiscriminatorField>>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register `T` under its root, keyed by its discriminator tag.
    pub fn register<T: Variant>(&mut self) -> Result<(), InternalError> {
        let tag = <T as Variant>::TAG;

        self.register_entry(
            <T::Root as Path>::PATH,
            tag.field,
            tag.value,
            VariantEntry::of::<T>(),
        )
    }

    /// Register an explicit entry. Re-registering the same type for the same
    /// key is a no-op; binding a different type is rejected.
    pub fn register_entry(
        &mut self,
        root: &'static str,
        field: &'static str,
        value: &'static str,
        entry: VariantEntry,
    ) -> Result<(), InternalError> {
        let fields = self.roots.entry(root).or_default();
        let index = match fields.iter().position(|f| f.name == field) {
            Some(index) => index,
            None => {
                fields.push(DiscriminatorField {
                    name: field,
                    variants: BTreeMap::new(),
                });
                fields.len() - 1
            }
        };
        let variants = &mut fields[index].variants;

        if let Some(existing) = variants.get(value) {
            if existing.type_id == entry.type_id {
                return Ok(());
            }

            return Err(RegistryError::DuplicateDiscriminator {
                root,
                field,
                value,
                existing: existing.type_name,
                requested: entry.type_name,
            }
            .into());
        }

        tracing::debug!(root, field, value, variant = entry.type_name, "registered variant");
        variants.insert(value, entry);

        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Pick the entry for `raw` within `root`.
    pub fn resolve(&self, root: &str, raw: &JsonObject) -> Result<&VariantEntry, InternalError> {
        let fields = self
            .roots
            .get(root)
            .ok_or_else(|| RegistryError::unknown(root, None, None))?;

        for field in fields {
            let Some(found) = raw.get(field.name) else {
                continue;
            };

            let JsonValue::String(value) = found else {
                return Err(RegistryError::unknown(root, Some(field.name), None).into());
            };

            let entry = field
                .variants
                .get(value.as_str())
                .ok_or_else(|| RegistryError::unknown(root, Some(field.name), Some(value)))?;

            tracing::trace!(root, field = field.name, value = %value, variant = entry.type_name, "resolved variant");

            return Ok(entry);
        }

        Err(RegistryError::unknown(root, None, None).into())
    }

    /// Find the entry bound to discriminator `value` under any field of `root`.
    pub fn find(&self, root: &str, value: &str) -> Result<&VariantEntry, InternalError> {
        self.roots
            .get(root)
            .and_then(|fields| fields.iter().find_map(|f| f.variants.get(value)))
            .ok_or_else(|| RegistryError::unknown(root, None, Some(value)).into())
    }

    #[must_use]
    pub fn contains(&self, root: &str, field: &str, value: &str) -> bool {
        self.roots.get(root).is_some_and(|fields| {
            fields
                .iter()
                .any(|f| f.name == field && f.variants.contains_key(value))
        })
    }

    /// Registered root paths, sorted.
    pub fn roots(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.roots.keys().copied()
    }

    /// Discriminator fields of `root` in resolution order.
    #[must_use]
    pub fn fields(&self, root: &str) -> Vec<&'static str> {
        self.roots
            .get(root)
            .map(|fields| fields.iter().map(|f| f.name).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roots
            .values()
            .flat_map(|fields| fields.iter().map(|f| f.variants.len()))
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ------------------------------------------------------------------
    // Process-wide access
    // ------------------------------------------------------------------

    /// Install this registry as the process-wide default. Write-once.
    pub fn install(self) -> Result<Arc<Self>, InternalError> {
        let registry = Arc::new(self);

        GLOBAL_REGISTRY
            .set(Arc::clone(&registry))
            .map_err(|_| RegistryError::AlreadyInstalled)?;

        tracing::debug!(variants = registry.len(), "installed global type registry");

        Ok(registry)
    }
}

/// Run `f` with `registry` as this thread's active registry.
///
/// The previous override is restored on every exit path, including unwind.
pub fn with_registry<R>(registry: &Arc<TypeRegistry>, f: impl FnOnce() -> R) -> R {
    struct Guard(Option<Arc<TypeRegistry>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            REGISTRY_OVERRIDE.with_borrow_mut(|slot| *slot = prev);
        }
    }

    let prev = REGISTRY_OVERRIDE.with_borrow_mut(|slot| slot.replace(Arc::clone(registry)));
    let _guard = Guard(prev);

    f()
}

/// Registry used by decodes on this thread: scoped override, then global.
pub fn active_registry() -> Result<Arc<TypeRegistry>, InternalError> {
    REGISTRY_OVERRIDE
        .with_borrow(Clone::clone)
        .or_else(|| GLOBAL_REGISTRY.get().cloned())
        .ok_or_else(|| RegistryError::RegistryUnavailable.into())
}
