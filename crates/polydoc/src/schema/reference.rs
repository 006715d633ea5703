use crate::core::model::RecordError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

///
/// ObjectRef
/// Bare reference to another object by id.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ObjectRef {
    pub id: Uuid,
}

impl ObjectRef {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self { id }
    }

    /// Parse an id or a link to the object.
    pub fn parse(input: &str) -> Result<Self, RecordError> {
        parse_object_id(input)
            .map(Self::new)
            .ok_or_else(|| RecordError::InvalidComposeArgs {
                message: format!("invalid object id: '{input}'"),
            })
    }
}

impl From<Uuid> for ObjectRef {
    fn from(id: Uuid) -> Self {
        Self::new(id)
    }
}

/// Extract an object id from a bare id (hyphenated or not) or from a link
/// whose last path segment ends in one, e.g. `https://host/My-Page-<32 hex>`.
/// A `#fragment` names a block and wins over the page id.
#[must_use]
pub fn parse_object_id(input: &str) -> Option<Uuid> {
    let input = input.trim();
    if let Ok(id) = Uuid::parse_str(input) {
        return Some(id);
    }

    let (path, fragment) = match input.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (input, None),
    };
    if let Some(id) = fragment.and_then(trailing_id) {
        return Some(id);
    }

    let path = path.split('?').next().unwrap_or(path);
    let segment = path.trim_end_matches('/').rsplit('/').next()?;

    trailing_id(segment)
}

// Last 32 characters of `segment`, if they form a simple-format id.
fn trailing_id(segment: &str) -> Option<Uuid> {
    let start = segment.len().checked_sub(32)?;
    let tail = segment.get(start..)?;
    if !tail.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    Uuid::parse_str(tail).ok()
}
