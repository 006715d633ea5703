use crate::{
    config::{Config, DEFAULT_PAGE_SIZE},
    error::InternalError,
    model::{record::decode_typed, registry::TypeRegistry},
    obs::EventSink,
    query::{QueryError, ResultSet, filter::Filter, sort::Sort},
    serialize::{JsonObject, object_from_value},
    stream::{PageSource, PaginatedStream},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use std::sync::Arc;

///
/// Query
///
/// Wire body of a database query. `filter` and `sorts` are omitted when
/// unset, `start_cursor` only when continuing; `page_size` is always sent.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Query {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    pub page_size: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            filter: None,
            sorts: Vec::new(),
            start_cursor: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Query {
    pub fn to_wire(&self) -> Result<JsonObject, InternalError> {
        object_from_value(self).map_err(Into::into)
    }
}

///
/// QueryBuilder
///
/// Fluent builder for one query against one page source.
///
/// ## Semantics
/// - `filter` always folds into AND; OR trees are built explicitly
/// - `sort` appends a key
/// - `limit` sets the page size, not a total result cap
/// - `execute`, `first` and `count` consume the builder
///

pub struct QueryBuilder<S, T> {
    source: S,
    decoder: Box<dyn Fn(JsonValue) -> Result<T, InternalError>>,
    config: Config,
    query: Query,
    params: JsonObject,
    registry: Option<Arc<TypeRegistry>>,
    sink: Option<Arc<dyn EventSink>>,
}

impl<S, T> QueryBuilder<S, T>
where
    S: PageSource,
    T: DeserializeOwned + 'static,
{
    /// Builder whose results decode with serde through the active registry.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_decoder(source, decode_typed::<T>)
    }
}

impl<S, T> QueryBuilder<S, T>
where
    S: PageSource,
    T: 'static,
{
    /// Builder whose results decode with a custom function.
    #[must_use]
    pub fn with_decoder(
        source: S,
        decoder: impl Fn(JsonValue) -> Result<T, InternalError> + 'static,
    ) -> Self {
        Self {
            source,
            decoder: Box::new(decoder),
            config: Config::default(),
            query: Query::default(),
            params: JsonObject::new(),
            registry: None,
            sink: None,
        }
    }

    // ------------------------------------------------------------------
    // Query shape
    // ------------------------------------------------------------------

    /// Add a filter. An existing AND root gains a child; any other existing
    /// root is wrapped together with `filter` in a new AND.
    pub fn filter(mut self, filter: impl Into<Filter>) -> Result<Self, QueryError> {
        let filter = filter.into();
        filter.validate()?;

        self.query.filter = Some(match self.query.filter.take() {
            Some(existing) => existing.and_with(filter),
            None => filter,
        });

        Ok(self)
    }

    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.query.sorts.push(sort);
        self
    }

    #[must_use]
    pub fn start_at(mut self, cursor: impl Into<String>) -> Self {
        self.query.start_cursor = Some(cursor.into());
        self
    }

    /// Set the page size; must be within `1..=max_page_size`.
    pub fn limit(mut self, page_size: u32) -> Result<Self, QueryError> {
        let max = self.config.max_page_size;
        if page_size == 0 || page_size > max {
            return Err(QueryError::InvalidArgument {
                name: "page_size",
                message: format!("must be between 1 and {max}, got {page_size}"),
            });
        }

        self.query.page_size = page_size;
        Ok(self)
    }

    /// Extra request parameter sent alongside the query body.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    // ------------------------------------------------------------------
    // Execution context
    // ------------------------------------------------------------------

    /// Apply `config`; the current page size is clamped to its maximum.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.query.page_size = config.cap_page_size(self.query.page_size);
        self.config = config;
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Full request body: the query plus extra params (params win).
    pub fn to_wire(&self) -> Result<JsonObject, InternalError> {
        let mut body = self.query.to_wire()?;
        body.extend(self.params.clone());

        Ok(body)
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Run the query, returning a lazy result set.
    pub fn execute(self) -> Result<ResultSet<S, T>, InternalError> {
        let body = self.to_wire()?;
        tracing::debug!(query = %JsonValue::Object(body.clone()), "executing query");

        let Self {
            source,
            decoder,
            config,
            query,
            params: _,
            registry,
            sink,
        } = self;

        let stream = PaginatedStream::with_decoder(source, decoder);

        Ok(ResultSet::new(configure(
            stream, body, &query, &config, registry, sink,
        )))
    }

    /// First result, or `None` for an empty result set.
    pub fn first(self) -> Result<Option<T>, InternalError> {
        let mut results = self.execute()?;

        results.next().transpose()
    }

    /// Number of results across every page. Items are counted, not decoded.
    pub fn count(self) -> Result<usize, InternalError> {
        let body = self.to_wire()?;
        let Self {
            source,
            config,
            query,
            registry,
            sink,
            ..
        } = self;

        let stream = PaginatedStream::with_decoder(source, |_| Ok(()));
        let mut stream = configure(stream, body, &query, &config, registry, sink);

        let mut total = 0;
        for item in &mut stream {
            item?;
            total += 1;
        }
        tracing::debug!(total, pages = stream.page_number(), "counted query results");

        Ok(total)
    }
}

/// Wire the query body into a stream: cursor and page size become stream
/// settings, everything else is sent as request params.
fn configure<S: PageSource, U>(
    stream: PaginatedStream<S, U>,
    mut body: JsonObject,
    query: &Query,
    config: &Config,
    registry: Option<Arc<TypeRegistry>>,
    sink: Option<Arc<dyn EventSink>>,
) -> PaginatedStream<S, U> {
    body.remove("page_size");
    body.remove("start_cursor");

    let mut stream = stream.page_size(query.page_size, config);
    if let Some(cursor) = &query.start_cursor {
        stream = stream.start_at(cursor.clone());
    }
    if let Some(registry) = registry {
        stream = stream.registry(registry);
    }
    if let Some(sink) = sink {
        stream = stream.sink(sink);
    }

    stream.traverse(body);

    stream
}
