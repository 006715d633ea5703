//! Observability: traversal events and sink abstractions.
//!
//! Stream logic never writes counters or log lines directly.
//! All instrumentation flows through `StreamEvent` and `EventSink`.

pub(crate) mod sink;

pub use sink::{CountingSink, EventSink, StreamCounters, StreamEvent, TracingSink};
