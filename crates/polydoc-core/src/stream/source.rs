use crate::{
    error::InternalError,
    stream::{PageRequest, ResultPage, StreamError},
};
use serde_json::Value as JsonValue;

///
/// PageSource
///
/// Fetches one page for a request. Implemented by whatever talks to the
/// remote API; any `FnMut(PageRequest) -> Result<ResultPage, _>` qualifies.
///

pub trait PageSource {
    fn fetch(&mut self, request: PageRequest) -> Result<ResultPage, InternalError>;
}

impl<F> PageSource for F
where
    F: FnMut(PageRequest) -> Result<ResultPage, InternalError>,
{
    fn fetch(&mut self, request: PageRequest) -> Result<ResultPage, InternalError> {
        self(request)
    }
}

///
/// MemorySource
///
/// In-memory listing served page by page. Cursors are item offsets; every
/// request is kept for inspection.
///

#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    items: Vec<JsonValue>,
    requests: Vec<PageRequest>,
}

impl MemorySource {
    #[must_use]
    pub const fn new(items: Vec<JsonValue>) -> Self {
        Self {
            items,
            requests: Vec::new(),
        }
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> &[PageRequest] {
        &self.requests
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl PageSource for MemorySource {
    fn fetch(&mut self, request: PageRequest) -> Result<ResultPage, InternalError> {
        let offset = match request.start_cursor.as_deref() {
            None => 0,
            Some(cursor) => cursor
                .parse::<usize>()
                .ok()
                .filter(|offset| *offset <= self.items.len())
                .ok_or_else(|| StreamError::Fetch {
                    message: format!("invalid start_cursor '{cursor}'"),
                })?,
        };
        let size = usize::try_from(request.page_size).unwrap_or(usize::MAX);
        let end = offset.saturating_add(size).min(self.items.len());
        let results = self.items[offset..end].to_vec();

        self.requests.push(request);

        if end < self.items.len() {
            Ok(ResultPage::more(results, end.to_string()))
        } else {
            Ok(ResultPage::last(results))
        }
    }
}
