use crate::{
    error::{ErrorClass, ErrorDetail, ErrorOrigin, InternalError},
    model::variant::Tag,
    serialize::JsonObject,
};
use thiserror::Error as ThisError;

///
/// MergePatchError
///
/// Structured failures for partial-update merges.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MergePatchError {
    #[error("field '{field}' is fixed to '{expected}' and cannot be set to {found}")]
    ImmutableField {
        field: &'static str,
        expected: &'static str,
        found: String,
    },
}

impl MergePatchError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::ImmutableField { .. } => ErrorClass::InvalidInput,
        }
    }
}

impl From<MergePatchError> for InternalError {
    fn from(err: MergePatchError) -> Self {
        Self::with_detail(err.class(), ErrorOrigin::Patch, ErrorDetail::Patch(err))
    }
}

/// Overwrite `target` with every key present in `partial`.
///
/// Keys absent from `partial` keep their current value; an explicit `null`
/// overwrites. Tag keys may only repeat their fixed value. Returns the keys
/// that were written, in `partial` order.
pub fn merge_object(
    target: &mut JsonObject,
    partial: JsonObject,
    tags: &[Tag],
) -> Result<Vec<String>, MergePatchError> {
    for (key, value) in &partial {
        let Some(tag) = tags.iter().find(|tag| tag.field == key) else {
            continue;
        };

        if value.as_str() != Some(tag.value) {
            return Err(MergePatchError::ImmutableField {
                field: tag.field,
                expected: tag.value,
                found: value.to_string(),
            });
        }
    }

    let mut applied = Vec::with_capacity(partial.len());
    for (key, value) in partial {
        if tags.iter().any(|tag| tag.field == key) {
            continue;
        }

        target.insert(key.clone(), value);
        applied.push(key);
    }

    Ok(applied)
}

/// Returns `true` when merging `partial` would not change `target`.
#[must_use]
pub fn is_noop(target: &JsonObject, partial: &JsonObject) -> bool {
    partial
        .iter()
        .all(|(key, value)| target.get(key).is_some_and(|current| current == value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value as JsonValue, json};

    const TAGS: &[Tag] = &[Tag::new("kind", "point")];

    fn object(value: JsonValue) -> JsonObject {
        match value {
            JsonValue::Object(object) => object,
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn present_keys_overwrite_and_absent_keys_survive() {
        let mut target = object(json!({"kind": "point", "x": 1, "y": 2}));
        let applied =
            merge_object(&mut target, object(json!({"x": 5})), TAGS).expect("merge");

        assert_eq!(applied, vec!["x".to_string()]);
        assert_eq!(JsonValue::Object(target), json!({"kind": "point", "x": 5, "y": 2}));
    }

    #[test]
    fn explicit_null_overwrites() {
        let mut target = object(json!({"x": 1, "label": "a"}));
        merge_object(&mut target, object(json!({"label": null})), TAGS).expect("merge");

        assert_eq!(target.get("label"), Some(&JsonValue::Null));
    }

    #[test]
    fn repeating_a_tag_value_is_allowed_but_not_reported() {
        let mut target = object(json!({"kind": "point", "x": 1}));
        let applied = merge_object(&mut target, object(json!({"kind": "point", "x": 3})), TAGS)
            .expect("same tag is fine");

        assert_eq!(applied, vec!["x".to_string()]);
    }

    #[test]
    fn changing_a_tag_fails_without_touching_target() {
        let mut target = object(json!({"kind": "point", "x": 1}));
        let err = merge_object(&mut target, object(json!({"x": 9, "kind": "circle"})), TAGS)
            .expect_err("tag is immutable");

        assert_eq!(
            err,
            MergePatchError::ImmutableField {
                field: "kind",
                expected: "point",
                found: "\"circle\"".to_string(),
            }
        );
        assert_eq!(target.get("x"), Some(&json!(1)));
    }

    #[test]
    fn noop_detection_compares_present_keys_only() {
        let target = object(json!({"x": 1, "y": 2}));

        assert!(is_noop(&target, &object(json!({"x": 1}))));
        assert!(!is_noop(&target, &object(json!({"x": 2}))));
        assert!(!is_noop(&target, &object(json!({"z": 0}))));
    }
}
