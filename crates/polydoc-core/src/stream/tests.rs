use super::*;
use crate::{
    config::Config,
    model::{record::Adaptive, registry::RegistryError},
    obs::{CountingSink, StreamCounters},
    serialize::JsonObject,
    test_fixtures::{Circle, ShapeRoot, fixture_registry},
};
use proptest::prelude::*;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

fn numbers(count: usize) -> Vec<JsonValue> {
    (0..count).map(|i| json!(i)).collect()
}

#[test]
fn stream_walks_every_page_lazily() {
    let mut stream = PaginatedStream::<_, u64>::new(MemorySource::new(numbers(250)));
    assert_eq!(stream.state(), StreamState::NotStarted);
    assert!(stream.source().requests().is_empty(), "nothing fetched yet");

    let first = stream.next().expect("one item").expect("decodes");
    assert_eq!(first, 0);
    assert_eq!(stream.page_number(), 1);
    assert_eq!(stream.state(), StreamState::Yielding);

    let rest: Vec<u64> = stream
        .by_ref()
        .collect::<Result<_, _>>()
        .expect("all items decode");

    assert_eq!(rest.len(), 249);
    assert_eq!(stream.page_number(), 3);
    assert_eq!(stream.total_items(), 250);
    assert_eq!(stream.state(), StreamState::Exhausted);
    assert!(!stream.has_more());
    assert_eq!(stream.next_cursor(), None);

    let sizes: Vec<u32> = stream
        .source()
        .requests()
        .iter()
        .map(|r| r.page_size)
        .collect();
    assert_eq!(sizes, vec![100, 100, 100]);
}

#[test]
fn empty_listing_is_one_page() {
    let mut stream = PaginatedStream::<_, u64>::new(MemorySource::new(Vec::new()));

    assert!(stream.next().is_none());
    assert_eq!(stream.page_number(), 1);
    assert_eq!(stream.total_items(), 0);
}

#[test]
fn page_size_is_capped_by_config() {
    let config = Config::default();
    let stream = PaginatedStream::<_, u64>::new(MemorySource::default()).page_size(500, &config);

    assert_eq!(stream.requested_page_size(), config.max_page_size);
}

#[test]
fn traverse_resets_and_forwards_params() {
    let mut stream =
        PaginatedStream::<_, u64>::new(MemorySource::new(numbers(3))).page_size(2, &Config::default());
    assert_eq!(stream.by_ref().count(), 3);

    let mut params = JsonObject::new();
    params.insert("filter".to_string(), json!({"property": "Done"}));

    let again: Vec<_> = stream.traverse(params).collect();
    assert_eq!(again.len(), 3);
    assert_eq!(stream.page_number(), 2);

    let last = stream.source().requests().last().expect("requests recorded");
    assert_eq!(last.params.get("filter"), Some(&json!({"property": "Done"})));
    assert_eq!(last.start_cursor.as_deref(), Some("2"));
}

#[test]
fn start_at_resumes_from_cursor() {
    let mut stream = PaginatedStream::<_, u64>::new(MemorySource::new(numbers(5)))
        .page_size(2, &Config::default())
        .start_at("3");

    let items: Vec<u64> = stream.by_ref().map(|r| r.expect("decodes")).collect();
    assert_eq!(items, vec![3, 4]);
}

#[test]
fn has_more_without_cursor_stops() {
    let source = |_: PageRequest| {
        Ok::<_, InternalError>(ResultPage {
            results: vec![json!(1)],
            has_more: true,
            next_cursor: None,
        })
    };
    let mut stream = PaginatedStream::<_, u64>::new(source);

    assert_eq!(stream.by_ref().count(), 1);
    assert_eq!(stream.page_number(), 1);
    assert_eq!(stream.state(), StreamState::Exhausted);
}

#[test]
fn fetch_error_is_yielded_once() {
    let mut calls = 0;
    let source = |request: PageRequest| {
        calls += 1;
        if request.start_cursor.is_none() {
            Ok(ResultPage::more(vec![json!(1)], "next"))
        } else {
            Err(InternalError::stream_internal("remote unavailable"))
        }
    };
    let sink = Arc::new(CountingSink::new());
    let mut stream = PaginatedStream::<_, u64>::new(source).sink(sink.clone());

    assert_eq!(stream.next().map(Result::ok), Some(Some(1)));
    let err = stream.next().expect("error item").expect_err("fetch failed");
    assert_eq!(err.message, "remote unavailable");
    assert!(stream.next().is_none());

    drop(stream);
    assert_eq!(calls, 2);
    assert_eq!(
        sink.snapshot(),
        StreamCounters {
            traversals: 1,
            pages: 1,
            items: 1,
            failures: 1,
        }
    );
}

#[test]
fn decode_error_stops_traversal() {
    let sink = Arc::new(CountingSink::new());
    let mut stream =
        PaginatedStream::<_, u64>::new(MemorySource::new(vec![json!(1), json!("two"), json!(3)]))
            .sink(sink.clone());

    assert!(matches!(stream.next(), Some(Ok(1))));
    assert!(matches!(stream.next(), Some(Err(_))));
    assert!(stream.next().is_none());
    assert_eq!(stream.state(), StreamState::Exhausted);
    assert_eq!(stream.total_items(), 1, "only the yielded item counts");
    assert_eq!(sink.snapshot().failures, 1);
}

#[test]
fn custom_decoder_transforms_items() {
    let mut stream = PaginatedStream::with_decoder(MemorySource::new(numbers(4)), |raw| {
        Ok(raw.as_u64().unwrap_or_default() * 10)
    });

    let items: Vec<u64> = stream.by_ref().map(|r| r.expect("decodes")).collect();
    assert_eq!(items, vec![0, 10, 20, 30]);
}

#[test]
fn adaptive_items_decode_through_stream_registry() {
    let source = MemorySource::new(vec![
        json!({"kind": "circle", "radius": 1.0}),
        json!({"kind": "square", "side": 2.0}),
    ]);
    let mut stream =
        PaginatedStream::<_, Adaptive<ShapeRoot>>::new(source).registry(fixture_registry());

    let first = stream.next().expect("item").expect("decodes");
    assert!(first.is::<Circle>());
    assert_eq!(stream.by_ref().count(), 1);
}

#[test]
fn adaptive_items_without_registry_fail_typed() {
    let source = MemorySource::new(vec![json!({"kind": "circle", "radius": 1.0})]);
    let mut stream = PaginatedStream::<_, Adaptive<ShapeRoot>>::new(source);

    let err = stream.next().expect("item").expect_err("no registry");
    assert!(matches!(
        err.registry_error(),
        Some(RegistryError::RegistryUnavailable)
    ));
}

proptest! {
    #[test]
    fn pages_fetched_match_ceiling_division(items in 0usize..400, page_size in 1u32..=100) {
        let mut stream = PaginatedStream::<_, u64>::new(MemorySource::new(numbers(items)))
            .page_size(page_size, &Config::default());

        let count = stream.by_ref().count();
        let expected_pages = items.div_ceil(page_size as usize).max(1);

        prop_assert_eq!(count, items);
        prop_assert_eq!(stream.page_number() as usize, expected_pages);
        prop_assert_eq!(stream.total_items(), items as u64);
    }
}
