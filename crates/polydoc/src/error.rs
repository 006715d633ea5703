use derive_more::Display;
use polydoc_core::{
    error::{ErrorClass, ErrorDetail, ErrorOrigin as CoreErrorOrigin, InternalError},
    model::{RecordError, RegistryError},
    patch::MergePatchError,
    query::QueryError,
    stream::StreamError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match &err.detail {
            Some(ErrorDetail::Registry(detail)) => ErrorKind::Registry(detail.into()),
            Some(ErrorDetail::Record(detail)) => ErrorKind::Record(detail.into()),
            Some(ErrorDetail::Patch(detail)) => ErrorKind::Record(detail.into()),
            Some(ErrorDetail::Query(detail)) => ErrorKind::Query(detail.into()),
            Some(ErrorDetail::Stream(detail)) => ErrorKind::Stream(detail.into()),
            Some(ErrorDetail::Serialize(_)) => ErrorKind::Malformed,
            Some(ErrorDetail::Config(_)) => ErrorKind::Config,
            None => match err.class {
                ErrorClass::InvalidInput => ErrorKind::Malformed,
                ErrorClass::Unsupported => ErrorKind::Unsupported,
                ErrorClass::NotFound
                | ErrorClass::Internal
                | ErrorClass::Conflict
                | ErrorClass::InvariantViolation => ErrorKind::Internal,
            },
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Registry(RegistryErrorKind),
    Record(RecordErrorKind),
    Query(QueryErrorKind),
    Stream(StreamErrorKind),

    /// Input could not be parsed at all.
    Malformed,

    /// Configuration is invalid.
    Config,

    /// The operation is not supported for this value.
    Unsupported,

    /// The caller cannot remediate this.
    Internal,
}

///
/// RegistryErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RegistryErrorKind {
    /// No registered type matches the input's discriminator.
    UnknownDiscriminator,

    /// A discriminator is already bound to another type.
    Duplicate,

    /// No registry is installed or in scope.
    Unavailable,
}

impl From<&RegistryError> for RegistryErrorKind {
    fn from(err: &RegistryError) -> Self {
        match err {
            RegistryError::UnknownDiscriminator { .. } => Self::UnknownDiscriminator,
            RegistryError::DuplicateDiscriminator { .. } | RegistryError::AlreadyInstalled => {
                Self::Duplicate
            }
            RegistryError::RegistryUnavailable => Self::Unavailable,
        }
    }
}

///
/// RecordErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RecordErrorKind {
    /// Input is not a JSON object or does not fit the type.
    Invalid,

    /// A tag field does not match the type, or a refresh tried to change it.
    TagMismatch,

    /// The type has no composer, or the composer rejected its arguments.
    Compose,

    /// A nested attribute is missing.
    MissingField,

    /// The record could not be written back out.
    Encode,
}

impl From<&RecordError> for RecordErrorKind {
    fn from(err: &RecordError) -> Self {
        match err {
            RecordError::InvalidInput { .. } | RecordError::Decode { .. } => Self::Invalid,
            RecordError::TagMismatch { .. } => Self::TagMismatch,
            RecordError::NotComposable { .. } | RecordError::InvalidComposeArgs { .. } => {
                Self::Compose
            }
            RecordError::FieldAccess { .. } => Self::MissingField,
            RecordError::Encode { .. } => Self::Encode,
        }
    }
}

impl From<&MergePatchError> for RecordErrorKind {
    fn from(err: &MergePatchError) -> Self {
        match err {
            MergePatchError::ImmutableField { .. } => Self::TagMismatch,
        }
    }
}

///
/// QueryErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// An argument is out of range (e.g. page size).
    InvalidArgument,

    /// A filter is structurally empty.
    EmptyFilter,
}

impl From<&QueryError> for QueryErrorKind {
    fn from(err: &QueryError) -> Self {
        match err {
            QueryError::InvalidArgument { .. } => Self::InvalidArgument,
            QueryError::EmptyCompound { .. } | QueryError::EmptyCondition { .. } => {
                Self::EmptyFilter
            }
        }
    }
}

///
/// StreamErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StreamErrorKind {
    Fetch,
    InvalidPage,
}

impl From<&StreamError> for StreamErrorKind {
    fn from(err: &StreamError) -> Self {
        match err {
            StreamError::Fetch { .. } => Self::Fetch,
            StreamError::InvalidPage { .. } => Self::InvalidPage,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Patch,
    Query,
    Record,
    Registry,
    Serialize,
    Stream,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Patch => Self::Patch,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Record => Self::Record,
            CoreErrorOrigin::Registry => Self::Registry,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Stream => Self::Stream,
        }
    }
}
