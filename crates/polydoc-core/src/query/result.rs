use crate::{
    error::InternalError,
    stream::{PageSource, PaginatedStream},
};

///
/// ResultSet
///
/// Lazy results of one executed query. Iterating pulls pages on demand;
/// the underlying stream stays reachable for cursor and page diagnostics.
///

#[derive(Debug)]
pub struct ResultSet<S, T> {
    stream: PaginatedStream<S, T>,
}

impl<S: PageSource, T> ResultSet<S, T> {
    pub(crate) const fn new(stream: PaginatedStream<S, T>) -> Self {
        Self { stream }
    }

    #[must_use]
    pub const fn stream(&self) -> &PaginatedStream<S, T> {
        &self.stream
    }

    #[must_use]
    pub fn into_stream(self) -> PaginatedStream<S, T> {
        self.stream
    }

    /// Drain every remaining result, stopping at the first error.
    pub fn collect_all(self) -> Result<Vec<T>, InternalError> {
        self.collect()
    }
}

impl<S: PageSource, T> Iterator for ResultSet<S, T> {
    type Item = Result<T, InternalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream.next()
    }
}
