//! Event sink boundary.
//!
//! `PaginatedStream` reports what it does through `StreamEvent`; the sink
//! decides whether that becomes a log line, a counter, or nothing.
use std::sync::atomic::{AtomicU64, Ordering};

///
/// StreamEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamEvent {
    TraversalStart {
        page_size: u32,
        resumed: bool,
    },
    PageFetched {
        page_number: u32,
        items: usize,
        has_more: bool,
    },
    TraversalFinish {
        pages: u32,
        items: u64,
        failed: bool,
    },
}

///
/// EventSink
///

pub trait EventSink: Send + Sync {
    fn record(&self, event: StreamEvent);
}

///
/// TracingSink
/// Default sink; writes every event as a `tracing` debug record.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: StreamEvent) {
        match event {
            StreamEvent::TraversalStart { page_size, resumed } => {
                tracing::debug!(page_size, resumed, "starting result traversal");
            }
            StreamEvent::PageFetched {
                page_number,
                items,
                has_more,
            } => {
                tracing::debug!(page_number, items, has_more, "loaded result page");
            }
            StreamEvent::TraversalFinish {
                pages,
                items,
                failed,
            } => {
                if failed {
                    tracing::debug!(pages, items, "result traversal stopped on error");
                } else {
                    tracing::debug!(pages, items, "result traversal exhausted");
                }
            }
        }
    }
}

///
/// StreamCounters
/// Point-in-time copy of a `CountingSink`.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StreamCounters {
    pub traversals: u64,
    pub pages: u64,
    pub items: u64,
    pub failures: u64,
}

///
/// CountingSink
/// Lock-free counters over every event it sees.
///

#[derive(Debug, Default)]
pub struct CountingSink {
    traversals: AtomicU64,
    pages: AtomicU64,
    items: AtomicU64,
    failures: AtomicU64,
}

impl CountingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> StreamCounters {
        StreamCounters {
            traversals: self.traversals.load(Ordering::Relaxed),
            pages: self.pages.load(Ordering::Relaxed),
            items: self.items.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.traversals.store(0, Ordering::Relaxed);
        self.pages.store(0, Ordering::Relaxed);
        self.items.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
    }
}

impl EventSink for CountingSink {
    fn record(&self, event: StreamEvent) {
        match event {
            StreamEvent::TraversalStart { .. } => {
                self.traversals.fetch_add(1, Ordering::Relaxed);
            }
            StreamEvent::PageFetched { items, .. } => {
                self.pages.fetch_add(1, Ordering::Relaxed);
                self.items.fetch_add(items as u64, Ordering::Relaxed);
            }
            StreamEvent::TraversalFinish { failed, .. } => {
                if failed {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_sink_accumulates_pages_and_items() {
        let sink = CountingSink::new();
        sink.record(StreamEvent::TraversalStart {
            page_size: 10,
            resumed: false,
        });
        sink.record(StreamEvent::PageFetched {
            page_number: 1,
            items: 10,
            has_more: true,
        });
        sink.record(StreamEvent::PageFetched {
            page_number: 2,
            items: 3,
            has_more: false,
        });
        sink.record(StreamEvent::TraversalFinish {
            pages: 2,
            items: 13,
            failed: false,
        });

        assert_eq!(
            sink.snapshot(),
            StreamCounters {
                traversals: 1,
                pages: 2,
                items: 13,
                failures: 0,
            }
        );

        sink.reset();
        assert_eq!(sink.snapshot(), StreamCounters::default());
    }
}
