use super::*;
use crate::{
    config::Config,
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::record::Adaptive,
    obs::CountingSink,
    stream::{MemorySource, PageRequest, ResultPage},
    test_fixtures::{Circle, ShapeRoot, Square, fixture_registry},
};
use proptest::prelude::*;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

fn done() -> Filter {
    Filter::property("Done", Condition::Checkbox(CheckboxCondition::default().equals(true)))
}

fn title_contains(text: &str) -> Filter {
    Filter::property("Title", Condition::Title(TextCondition::default().contains(text)))
}

fn builder(items: usize) -> QueryBuilder<MemorySource, JsonValue> {
    QueryBuilder::new(MemorySource::new((0..items).map(|i| json!({"n": i})).collect()))
}

// ----------------------------------------------------------------------
// Filter folding
// ----------------------------------------------------------------------

#[test]
fn single_filter_is_the_root() {
    let query = builder(0).filter(done()).expect("filter").query().clone();

    assert_eq!(query.filter, Some(done()));
}

#[test]
fn repeated_filters_fold_into_one_flat_and() {
    let query = builder(0)
        .filter(done())
        .and_then(|b| b.filter(title_contains("milk")))
        .and_then(|b| b.filter(title_contains("eggs")))
        .expect("filters")
        .query()
        .clone();

    assert_eq!(
        query.filter,
        Some(Filter::Compound(CompoundFilter::And(vec![
            done(),
            title_contains("milk"),
            title_contains("eggs"),
        ])))
    );
}

#[test]
fn or_root_is_wrapped_not_extended() {
    let either = Filter::or(vec![title_contains("a"), title_contains("b")]).expect("or");
    let query = builder(0)
        .filter(either.clone())
        .and_then(|b| b.filter(done()))
        .expect("filters")
        .query()
        .clone();

    assert_eq!(
        query.filter,
        Some(Filter::Compound(CompoundFilter::And(vec![either, done()])))
    );
}

#[test]
fn empty_compound_and_blank_condition_are_rejected() {
    assert!(matches!(
        Filter::and(Vec::new()),
        Err(QueryError::EmptyCompound { op: "and" })
    ));

    let blank = Filter::property("Score", Condition::Number(NumberCondition::default()));
    let err = builder(0).filter(blank).err().expect("blank condition");
    assert!(matches!(err, QueryError::EmptyCondition { ref target } if target == "Score"));

    let nested = Filter::Compound(CompoundFilter::Or(Vec::new()));
    assert!(matches!(
        builder(0).filter(nested).err(),
        Some(QueryError::EmptyCompound { op: "or" })
    ));
}

#[test]
fn operators_build_compounds() {
    let both = done() & title_contains("x") & title_contains("y");
    let either = done() | title_contains("x");

    assert_eq!(both.leaf_count(), 3);
    assert!(matches!(both, Filter::Compound(CompoundFilter::And(ref c)) if c.len() == 3));
    assert!(matches!(either, Filter::Compound(CompoundFilter::Or(ref c)) if c.len() == 2));
}

// ----------------------------------------------------------------------
// Wire shape
// ----------------------------------------------------------------------

#[test]
fn empty_query_sends_only_page_size() {
    let wire = builder(0).to_wire().expect("wire");

    assert_eq!(JsonValue::Object(wire), json!({"page_size": 100}));
}

#[test]
fn full_query_wire_shape() {
    let wire = builder(0)
        .filter(done())
        .and_then(|b| {
            b.filter(Filter::timestamp(
                TimestampKind::CreatedTime,
                DateCondition::default().after("2024-01-01"),
            ))
        })
        .expect("filters")
        .sort(Sort::descending("Due"))
        .sort(Sort::by_timestamp(
            TimestampKind::LastEditedTime,
            SortDirection::Ascending,
        ))
        .start_at("cursor-1")
        .limit(25)
        .expect("limit")
        .to_wire()
        .expect("wire");

    assert_eq!(
        JsonValue::Object(wire),
        json!({
            "filter": {"and": [
                {"property": "Done", "checkbox": {"equals": true}},
                {"timestamp": "created_time", "created_time": {"after": "2024-01-01"}}
            ]},
            "sorts": [
                {"property": "Due", "direction": "descending"},
                {"timestamp": "last_edited_time", "direction": "ascending"}
            ],
            "start_cursor": "cursor-1",
            "page_size": 25
        })
    );
}

#[test]
fn filter_wire_decodes_back() {
    let filter = done() & Filter::search("object", "page");
    let raw = serde_json::to_value(&filter).expect("encode");
    let decoded: Filter = serde_json::from_value(raw).expect("decode");

    assert_eq!(decoded, filter);
}

#[test]
fn params_are_merged_into_the_body() {
    let wire = builder(0)
        .param("archived", false)
        .to_wire()
        .expect("wire");

    assert_eq!(wire.get("archived"), Some(&json!(false)));
}

// ----------------------------------------------------------------------
// Limits
// ----------------------------------------------------------------------

#[test]
fn limit_out_of_range_is_invalid_argument() {
    for bad in [0, 101] {
        let err = builder(0).limit(bad).err().expect("out of range");
        let err: InternalError = err.into();

        assert_eq!(err.class, ErrorClass::InvalidInput);
        assert_eq!(err.origin, ErrorOrigin::Query);
        assert!(matches!(
            err.query_error(),
            Some(QueryError::InvalidArgument {
                name: "page_size",
                ..
            })
        ));
    }

    assert_eq!(builder(0).limit(100).expect("max").query().page_size, 100);
}

#[test]
fn config_lowers_the_page_size_ceiling() {
    let config = Config {
        default_page_size: 10,
        max_page_size: 20,
    };
    let builder = builder(0).config(config);

    assert_eq!(builder.query().page_size, 20);
    assert!(builder.limit(21).is_err());
}

// ----------------------------------------------------------------------
// Execution
// ----------------------------------------------------------------------

#[test]
fn execute_streams_every_page() {
    let results = builder(250)
        .execute()
        .expect("execute")
        .collect_all()
        .expect("results");

    assert_eq!(results.len(), 250);
    assert_eq!(results[249], json!({"n": 249}));
}

#[test]
fn execute_sends_filter_on_every_page() {
    let mut results = builder(5)
        .filter(done())
        .expect("filter")
        .limit(2)
        .expect("limit")
        .execute()
        .expect("execute");

    assert_eq!(results.by_ref().count(), 5);

    let stream = results.stream();
    assert_eq!(stream.page_number(), 3);

    let requests = stream.source().requests();
    assert_eq!(requests.len(), 3);
    for request in requests {
        assert_eq!(request.page_size, 2);
        assert_eq!(
            request.params.get("filter"),
            Some(&json!({"property": "Done", "checkbox": {"equals": true}}))
        );
        assert!(!request.params.contains_key("page_size"));
    }
    assert_eq!(requests[0].start_cursor, None);
    assert_eq!(requests[1].start_cursor.as_deref(), Some("2"));
}

#[test]
fn start_at_is_the_first_request_cursor() {
    let results: Vec<_> = builder(4)
        .start_at("3")
        .execute()
        .expect("execute")
        .map(|r| r.expect("decodes"))
        .collect();

    assert_eq!(results, vec![json!({"n": 3})]);
}

#[test]
fn first_returns_none_when_empty() {
    assert_eq!(builder(0).first().expect("first"), None);
    assert_eq!(builder(3).first().expect("first"), Some(json!({"n": 0})));
}

#[test]
fn count_spans_pages_without_decoding() {
    let source = MemorySource::new(vec![json!("not a shape"); 7]);
    let sink = Arc::new(CountingSink::new());
    let count = QueryBuilder::<_, Adaptive<ShapeRoot>>::new(source)
        .limit(3)
        .expect("limit")
        .sink(sink.clone())
        .count()
        .expect("count");

    assert_eq!(count, 7);
    assert_eq!(sink.snapshot().pages, 3);
}

#[test]
fn adaptive_results_decode_with_builder_registry() {
    let source = MemorySource::new(vec![
        json!({"kind": "square", "side": 1.0}),
        json!({"kind": "circle", "radius": 2.0}),
    ]);
    let results = QueryBuilder::<_, Adaptive<ShapeRoot>>::new(source)
        .registry(fixture_registry())
        .execute()
        .expect("execute")
        .collect_all()
        .expect("decodes");

    assert!(results[0].is::<Square>());
    assert!(results[1].is::<Circle>());
}

#[test]
fn source_error_surfaces_from_execute_iteration() {
    let source = |_: PageRequest| -> Result<ResultPage, InternalError> {
        Err(InternalError::stream_internal("offline"))
    };
    let err = QueryBuilder::<_, JsonValue>::new(source)
        .first()
        .expect_err("source fails");

    assert_eq!(err.message, "offline");
}

proptest! {
    #[test]
    fn folding_keeps_every_filter_in_order(count in 1usize..12) {
        let filters: Vec<Filter> = (0..count).map(|i| title_contains(&i.to_string())).collect();

        let mut builder = builder(0);
        for filter in filters.clone() {
            builder = builder.filter(filter).expect("valid filter");
        }
        let root = builder.query().filter.clone().expect("root filter");

        prop_assert_eq!(root.leaf_count(), count);
        if count == 1 {
            prop_assert_eq!(root, filters[0].clone());
        } else {
            prop_assert_eq!(root, Filter::Compound(CompoundFilter::And(filters)));
        }
    }
}
