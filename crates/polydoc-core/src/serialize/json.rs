use crate::serialize::SerializeError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value as JsonValue};

///
/// JsonObject
/// Raw JSON object as received from (or sent to) the remote API.
///

pub type JsonObject = Map<String, JsonValue>;

/// Serialize a value into JSON text.
pub(super) fn serialize<T>(t: &T) -> Result<String, SerializeError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(t).map_err(|e| SerializeError::Serialize(e.to_string()))
}

/// Deserialize JSON text into a value.
pub(super) fn deserialize<T>(text: &str) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(text).map_err(|e| SerializeError::Deserialize(e.to_string()))
}

/// Deserialize JSON text after checking its length against `max_bytes`.
pub(super) fn deserialize_bounded<T>(text: &str, max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    if text.len() > max_bytes {
        return Err(SerializeError::DeserializeSizeLimitExceeded {
            len: text.len(),
            max_bytes,
        });
    }

    deserialize(text)
}

/// Serialize a value and require the result to be a JSON object.
pub fn object_from_value<T>(value: &T) -> Result<JsonObject, SerializeError>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(other) => Err(SerializeError::Serialize(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(err) => Err(SerializeError::Serialize(err.to_string())),
    }
}

/// Short label for the JSON kind of a value, used in error messages.
pub(crate) const fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
