use crate::{
    config::ConfigError,
    model::{record::RecordError, registry::RegistryError},
    patch::MergePatchError,
    query::QueryError,
    serialize::SerializeError,
    stream::StreamError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every module error converts into this type at the crate boundary; the
/// original typed error is kept in `detail` so callers can still match on it.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct an InternalError that carries its typed source.
    pub(crate) fn with_detail(class: ErrorClass, origin: ErrorOrigin, detail: ErrorDetail) -> Self {
        Self {
            class,
            origin,
            message: detail.to_string(),
            detail: Some(detail),
        }
    }

    /// Construct a stream-origin internal error, typically raised by a page source.
    pub fn stream_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Stream, message)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }

    // ------------------------------------------------------------------
    // Detail accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn registry_error(&self) -> Option<&RegistryError> {
        match &self.detail {
            Some(ErrorDetail::Registry(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn record_error(&self) -> Option<&RecordError> {
        match &self.detail {
            Some(ErrorDetail::Record(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn query_error(&self) -> Option<&QueryError> {
        match &self.detail {
            Some(ErrorDetail::Query(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn stream_error(&self) -> Option<&StreamError> {
        match &self.detail {
            Some(ErrorDetail::Stream(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn patch_error(&self) -> Option<&MergePatchError> {
        match &self.detail {
            Some(ErrorDetail::Patch(err)) => Some(err),
            _ => None,
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Registry(RegistryError),

    #[error("{0}")]
    Record(RecordError),

    #[error("{0}")]
    Patch(MergePatchError),

    #[error("{0}")]
    Query(QueryError),

    #[error("{0}")]
    Stream(StreamError),

    #[error("{0}")]
    Serialize(SerializeError),

    #[error("{0}")]
    Config(ConfigError),
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidInput,
    NotFound,
    Internal,
    Conflict,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Patch,
    Query,
    Record,
    Registry,
    Serialize,
    Stream,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Patch => "patch",
            Self::Query => "query",
            Self::Record => "record",
            Self::Registry => "registry",
            Self::Serialize => "serialize",
            Self::Stream => "stream",
        };
        write!(f, "{label}")
    }
}
