//! Lazy traversal of cursor-paginated listings.
//!
//! A `PaginatedStream` pulls pages from a `PageSource` only when its buffer
//! runs dry, and decodes each item on the way out.

mod page;
mod paginated;
mod source;

#[cfg(test)]
mod tests;

use crate::error::{ErrorClass, ErrorDetail, ErrorOrigin, InternalError};
use std::fmt;
use thiserror::Error as ThisError;

pub use page::{PageRequest, ResultPage};
pub use paginated::{Decoder, PaginatedStream};
pub use source::{MemorySource, PageSource};

///
/// StreamError
///

#[derive(Debug, ThisError)]
pub enum StreamError {
    #[error("page fetch failed: {message}")]
    Fetch { message: String },

    #[error("invalid result page: {message}")]
    InvalidPage { message: String },
}

impl StreamError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Fetch { .. } => ErrorClass::Internal,
            Self::InvalidPage { .. } => ErrorClass::InvalidInput,
        }
    }
}

impl From<StreamError> for InternalError {
    fn from(err: StreamError) -> Self {
        Self::with_detail(err.class(), ErrorOrigin::Stream, ErrorDetail::Stream(err))
    }
}

///
/// StreamState
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StreamState {
    #[default]
    NotStarted,
    Fetching,
    Yielding,
    Exhausted,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not_started",
            Self::Fetching => "fetching",
            Self::Yielding => "yielding",
            Self::Exhausted => "exhausted",
        };
        write!(f, "{label}")
    }
}
