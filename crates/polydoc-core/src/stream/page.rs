use crate::{error::InternalError, serialize::JsonObject, stream::StreamError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

///
/// ResultPage
///
/// One page of a paginated listing as returned by the remote API.
/// `next_cursor` is only meaningful while `has_more` is set.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ResultPage {
    pub results: Vec<JsonValue>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl ResultPage {
    /// Final page holding `results`.
    #[must_use]
    pub const fn last(results: Vec<JsonValue>) -> Self {
        Self {
            results,
            has_more: false,
            next_cursor: None,
        }
    }

    /// Intermediate page continuing at `cursor`.
    #[must_use]
    pub fn more(results: Vec<JsonValue>, cursor: impl Into<String>) -> Self {
        Self {
            results,
            has_more: true,
            next_cursor: Some(cursor.into()),
        }
    }

    /// Decode a raw response body.
    pub fn from_value(raw: JsonValue) -> Result<Self, InternalError> {
        serde_json::from_value(raw).map_err(|err| {
            StreamError::InvalidPage {
                message: err.to_string(),
            }
            .into()
        })
    }

    /// Cursor to continue from, if the listing has more pages.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

///
/// PageRequest
/// What the stream asks its source for.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageRequest {
    pub start_cursor: Option<String>,
    pub page_size: u32,
    pub params: JsonObject,
}

impl PageRequest {
    /// Request body: caller params plus `page_size`, and `start_cursor`
    /// only when continuing.
    #[must_use]
    pub fn to_wire(&self) -> JsonObject {
        let mut body = self.params.clone();
        body.insert("page_size".to_string(), JsonValue::from(self.page_size));

        if let Some(cursor) = &self.start_cursor {
            body.insert("start_cursor".to_string(), JsonValue::from(cursor.as_str()));
        }

        body
    }
}
