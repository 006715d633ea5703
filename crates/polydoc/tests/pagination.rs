mod common;

use common::{MockApi, init_tracing, schema_registry, task_page};
use polydoc::{
    core::{
        config::Config,
        obs::CountingSink,
        stream::{PaginatedStream, StreamState},
    },
    prelude::*,
};
use proptest::prelude::*;
use serde_json::{Map, json};
use std::sync::Arc;

#[test]
fn two_hundred_fifty_items_span_three_pages() {
    init_tracing();

    let mut stream = PaginatedStream::<_, Page>::new(MockApi::tasks(250))
        .page_size(100, &Config::default())
        .registry(schema_registry());

    let pages: Vec<Page> = stream.by_ref().map(|page| page.expect("decodes")).collect();

    assert_eq!(pages.len(), 250);
    assert_eq!(stream.page_number(), 3);
    assert_eq!(stream.total_items(), 250);
    assert_eq!(stream.state(), StreamState::Exhausted);
    assert_eq!(stream.source().calls(), 3);
    assert_eq!(pages[249].title().as_deref(), Some("Task 249"));
}

#[test]
fn mixed_records_resolve_per_item() {
    init_tracing();

    let items = vec![
        task_page(1),
        json!({"object": "block", "type": "divider", "divider": {}}),
        json!({"object": "user", "type": "bot", "id": "5e5f8a1c-2b3d-4e6f-8a9b-0c1d2e3f4a5b"}),
    ];
    let records: Vec<Adaptive<RecordRoot>> = PaginatedStream::new(MockApi::new(items))
        .registry(schema_registry())
        .collect::<Result<_, _>>()
        .expect("all decode");

    let names: Vec<_> = records.iter().map(Adaptive::variant_name).collect();
    assert_eq!(names, vec!["Page", "Divider", "Bot"]);
}

#[test]
fn traversal_params_reach_every_request() {
    let mut params = Map::new();
    params.insert("filter".to_string(), json!({"property": "Done", "checkbox": {"equals": true}}));

    let mut stream = PaginatedStream::<_, Page>::new(MockApi::tasks(5))
        .page_size(2, &Config::default())
        .registry(schema_registry());
    let count = stream.traverse(params).count();

    assert_eq!(count, 5);
    let bodies = &stream.source().bodies;
    assert_eq!(bodies.len(), 3);
    assert!(bodies.iter().all(|body| body.contains_key("filter")));
    assert_eq!(bodies[1]["start_cursor"], json!("cursor-2"));
}

#[test]
fn fetch_failure_ends_the_traversal() {
    let mut api = MockApi::tasks(300);
    api.fail_on_call = Some(2);
    let sink = Arc::new(CountingSink::new());

    let results: Vec<_> = PaginatedStream::<_, Page>::new(api)
        .registry(schema_registry())
        .sink(sink.clone())
        .collect();

    assert_eq!(results.len(), 101);
    assert!(results[..100].iter().all(Result::is_ok));
    let err = results[100].as_ref().expect_err("second page fails");
    assert!(err.message.contains("503"));

    let counters = sink.snapshot();
    assert_eq!(counters.pages, 1);
    assert_eq!(counters.failures, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn page_count_is_ceiling_of_items_over_size(items in 0usize..260, size in 1u32..=100) {
        let mut stream = PaginatedStream::<_, Page>::new(MockApi::tasks(items))
            .page_size(size, &Config::default())
            .registry(schema_registry());

        let yielded = stream.by_ref().filter(Result::is_ok).count();
        let expected_pages = items.div_ceil(size as usize).max(1);

        prop_assert_eq!(yielded, items);
        prop_assert_eq!(stream.page_number() as usize, expected_pages);
    }
}
