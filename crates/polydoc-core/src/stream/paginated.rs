use crate::{
    config::Config,
    error::InternalError,
    model::{
        record::decode_typed,
        registry::{TypeRegistry, with_registry},
    },
    obs::{EventSink, StreamEvent, TracingSink},
    serialize::JsonObject,
    stream::{PageRequest, PageSource, StreamState},
};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::{collections::VecDeque, fmt, sync::Arc};

///
/// Decoder
/// Turns one raw listing item into the caller's item type.
///

pub type Decoder<T> = Box<dyn Fn(JsonValue) -> Result<T, InternalError>>;

///
/// PaginatedStream
///
/// Lazy iterator over every item of a cursor-paginated listing.
///
/// ## Semantics
/// - nothing is fetched until the first `next()`
/// - the next page is fetched only once the buffer is empty, and only while
///   the previous page reported `has_more` with a cursor
/// - the first fetch or decode error is yielded once, then the stream is
///   exhausted
///

pub struct PaginatedStream<S, T> {
    source: S,
    decoder: Decoder<T>,
    registry: Option<Arc<TypeRegistry>>,
    sink: Arc<dyn EventSink>,

    page_size: u32,
    params: JsonObject,
    start_cursor: Option<String>,

    state: StreamState,
    buffer: VecDeque<JsonValue>,
    page_number: u32,
    total_items: u64,
    next_cursor: Option<String>,
    has_more: bool,
}

impl<S, T> PaginatedStream<S, T>
where
    S: PageSource,
    T: DeserializeOwned + 'static,
{
    /// Stream that decodes items with serde through the active registry.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_decoder(source, decode_typed::<T>)
    }
}

impl<S, T> PaginatedStream<S, T>
where
    S: PageSource,
{
    /// Stream that decodes items with a custom function.
    #[must_use]
    pub fn with_decoder(
        source: S,
        decoder: impl Fn(JsonValue) -> Result<T, InternalError> + 'static,
    ) -> Self {
        let config = Config::default();

        Self {
            source,
            decoder: Box::new(decoder),
            registry: None,
            sink: Arc::new(TracingSink),
            page_size: config.default_page_size,
            params: JsonObject::new(),
            start_cursor: None,
            state: StreamState::NotStarted,
            buffer: VecDeque::new(),
            page_number: 0,
            total_items: 0,
            next_cursor: None,
            has_more: false,
        }
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Use `config`'s default page size.
    #[must_use]
    pub const fn config(mut self, config: &Config) -> Self {
        self.page_size = config.default_page_size;
        self
    }

    /// Request `page_size` items per page, capped by `config`.
    #[must_use]
    pub fn page_size(mut self, page_size: u32, config: &Config) -> Self {
        self.page_size = config.cap_page_size(page_size);
        self
    }

    /// Decode items against `registry` instead of the thread's active one.
    #[must_use]
    pub fn registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Resume a listing from a cursor returned by an earlier traversal.
    #[must_use]
    pub fn start_at(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Reset counters and cursor, then iterate with `params` sent on every
    /// page request.
    pub fn traverse(&mut self, params: JsonObject) -> &mut Self {
        self.params = params;
        self.state = StreamState::NotStarted;
        self.buffer.clear();
        self.page_number = 0;
        self.total_items = 0;
        self.next_cursor = None;
        self.has_more = false;

        self
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Items handed out so far; a failed decode is not counted.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    #[must_use]
    pub const fn requested_page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn begin(&mut self) {
        self.next_cursor.clone_from(&self.start_cursor);
        self.sink.record(StreamEvent::TraversalStart {
            page_size: self.page_size,
            resumed: self.next_cursor.is_some(),
        });
        self.state = StreamState::Fetching;
    }

    fn fetch_page(&mut self) -> Result<(), InternalError> {
        let request = PageRequest {
            start_cursor: self.next_cursor.take(),
            page_size: self.page_size,
            params: self.params.clone(),
        };
        let page = self.source.fetch(request)?;

        self.page_number += 1;
        self.has_more = page.has_more;
        self.next_cursor = page.continuation().map(str::to_string);

        self.sink.record(StreamEvent::PageFetched {
            page_number: self.page_number,
            items: page.results.len(),
            has_more: self.has_more,
        });
        if self.has_more && self.next_cursor.is_none() {
            tracing::debug!(
                page_number = self.page_number,
                "page reported more results without a cursor"
            );
        }

        self.buffer.extend(page.results);
        self.state = StreamState::Yielding;

        Ok(())
    }

    fn decode(&self, raw: JsonValue) -> Result<T, InternalError> {
        match &self.registry {
            Some(registry) => with_registry(registry, || (self.decoder)(raw)),
            None => (self.decoder)(raw),
        }
    }

    fn finish(&mut self, failed: bool) {
        self.state = StreamState::Exhausted;
        self.buffer.clear();
        self.sink.record(StreamEvent::TraversalFinish {
            pages: self.page_number,
            items: self.total_items,
            failed,
        });
    }
}

impl<S, T> Iterator for PaginatedStream<S, T>
where
    S: PageSource,
{
    type Item = Result<T, InternalError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                StreamState::Exhausted => return None,
                StreamState::NotStarted => self.begin(),
                StreamState::Fetching => {
                    if let Err(err) = self.fetch_page() {
                        self.finish(true);
                        return Some(Err(err));
                    }
                }
                StreamState::Yielding => {
                    let Some(raw) = self.buffer.pop_front() else {
                        if self.has_more && self.next_cursor.is_some() {
                            self.state = StreamState::Fetching;
                        } else {
                            self.finish(false);
                        }
                        continue;
                    };

                    return match self.decode(raw) {
                        Ok(item) => {
                            self.total_items += 1;
                            Some(Ok(item))
                        }
                        Err(err) => {
                            self.finish(true);
                            Some(Err(err))
                        }
                    };
                }
            }
        }
    }
}

impl<S, T> fmt::Debug for PaginatedStream<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedStream")
            .field("state", &self.state)
            .field("page_size", &self.page_size)
            .field("page_number", &self.page_number)
            .field("total_items", &self.total_items)
            .field("buffered", &self.buffer.len())
            .field("has_more", &self.has_more)
            .field("next_cursor", &self.next_cursor)
            .finish_non_exhaustive()
    }
}
