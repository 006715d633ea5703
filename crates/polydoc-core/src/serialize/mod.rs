mod json;

use crate::error::{ErrorClass, ErrorDetail, ErrorOrigin, InternalError};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error as ThisError;

pub(crate) use json::json_kind;
pub use json::{JsonObject, object_from_value};

/// Generic JSON serialization infrastructure.
///
/// This module is format-level only:
/// - No record or registry policy is defined here.
/// - Callers that need bounded decode must pass explicit limits.

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("deserialize size limit exceeded: {len} bytes (limit {max_bytes})")]
    DeserializeSizeLimitExceeded { len: usize, max_bytes: usize },
}

///
/// SerializeErrorKind
///
/// Stable error-kind taxonomy for serializer failures.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SerializeErrorKind {
    Serialize,
    Deserialize,
    DeserializeSizeLimitExceeded,
}

impl SerializeErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serialize => "serialize",
            Self::Deserialize => "deserialize",
            Self::DeserializeSizeLimitExceeded => "deserialize_size_limit_exceeded",
        }
    }
}

impl fmt::Display for SerializeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SerializeError {
    /// Return a stable error kind independent of backend error-message text.
    #[must_use]
    pub const fn kind(&self) -> SerializeErrorKind {
        match self {
            Self::Serialize(_) => SerializeErrorKind::Serialize,
            Self::Deserialize(_) => SerializeErrorKind::Deserialize,
            Self::DeserializeSizeLimitExceeded { .. } => {
                SerializeErrorKind::DeserializeSizeLimitExceeded
            }
        }
    }

    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Serialize(_) => ErrorClass::Internal,
            Self::Deserialize(_) | Self::DeserializeSizeLimitExceeded { .. } => {
                ErrorClass::InvalidInput
            }
        }
    }
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        Self::with_detail(
            err.class(),
            ErrorOrigin::Serialize,
            ErrorDetail::Serialize(err),
        )
    }
}

/// Encode a value as compact JSON text.
pub fn serialize<T>(ty: &T) -> Result<String, SerializeError>
where
    T: Serialize + ?Sized,
{
    json::serialize(ty)
}

/// Decode a value produced by [`serialize`] (or sent by the remote API).
pub fn deserialize<T>(text: &str) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    json::deserialize(text)
}

/// Decode JSON text with an explicit size limit.
///
/// Size limits are caller policy, not serialization-format policy.
pub fn deserialize_bounded<T>(text: &str, max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    json::deserialize_bounded(text, max_bytes)
}
