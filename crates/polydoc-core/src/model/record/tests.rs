use super::*;
use crate::{
    error::ErrorOrigin,
    model::{registry::RegistryError, variant::Nested},
    test_fixtures::{AnyRoot, Callout, CalloutBody, Circle, NoteRoot, Point, ShapeRoot, Square, fixture_registry},
};
use serde_json::json;

fn shape(raw: JsonValue) -> Result<Adaptive<ShapeRoot>, InternalError> {
    Adaptive::from_value_in(&fixture_registry(), raw)
}

// ----------------------------------------------------------------------
// Adaptive decode
// ----------------------------------------------------------------------

#[test]
fn adaptive_decode_selects_concrete_type() {
    let circle = shape(json!({"kind": "circle", "radius": 1.0})).expect("circle decodes");
    let square = shape(json!({"kind": "square", "side": 2.0})).expect("square decodes");

    assert!(circle.is::<Circle>());
    assert_eq!(circle.downcast_ref::<Circle>().map(|c| c.radius), Some(1.0));
    assert!(square.is::<Square>());
    assert_eq!(square.variant_name(), "Square");
    assert_eq!(square.tag(), Tag::new("kind", "square"));
}

#[test]
fn adaptive_decode_rejects_unknown_discriminator() {
    let err = shape(json!({"kind": "triangle"})).expect_err("triangle is unknown");

    assert!(matches!(
        err.registry_error(),
        Some(RegistryError::UnknownDiscriminator { .. })
    ));
}

#[test]
fn adaptive_decode_rejects_non_object_input() {
    let err = shape(json!([1, 2, 3])).expect_err("arrays are not records");

    assert_eq!(err.origin, ErrorOrigin::Record);
    assert!(matches!(
        err.record_error(),
        Some(RecordError::InvalidInput { found: "array", .. })
    ));
}

#[test]
fn adaptive_decode_without_registry_is_unavailable() {
    let err = Adaptive::<ShapeRoot>::from_value(json!({"kind": "circle", "radius": 1.0}))
        .expect_err("no registry on this thread");

    assert!(matches!(
        err.registry_error(),
        Some(RegistryError::RegistryUnavailable)
    ));
}

#[test]
fn parse_returns_existing_instance_unchanged() {
    let original = Adaptive::<ShapeRoot>::new(Square { side: 3.0 });
    let parsed = Adaptive::parse(original.clone()).expect("instance passes through");

    assert_eq!(parsed, original);
}

#[test]
fn parse_accepts_concrete_variant_and_json_text() {
    let registry = fixture_registry();

    let wrapped = Adaptive::<ShapeRoot>::parse(Point { x: 1, y: 2 }).expect("wrap variant");
    assert!(wrapped.is::<Point>());

    let parsed = with_registry(&registry, || {
        Adaptive::<ShapeRoot>::parse(r#"{"kind":"circle","radius":4.5}"#)
    })
    .expect("json text decodes");
    assert_eq!(parsed.downcast_ref::<Circle>().map(|c| c.radius), Some(4.5));
}

#[test]
fn delegate_entry_resolves_in_nested_hierarchy() {
    let registry = fixture_registry();
    let record = Adaptive::<AnyRoot>::from_value_in(
        &registry,
        json!({"object": "shape", "kind": "square", "side": 1.5}),
    )
    .expect("delegate resolves through the shape root");

    assert!(record.is::<Square>());
    assert_eq!(record.variant_name(), "Square");
}

#[test]
fn into_variant_returns_self_on_type_mismatch() {
    let record = Adaptive::<ShapeRoot>::new(Square { side: 1.0 });
    let record = record
        .into_variant::<Circle>()
        .expect_err("square is not a circle");
    let square = record.into_variant::<Square>().expect("square");

    assert_eq!(square, Square { side: 1.0 });
}

// ----------------------------------------------------------------------
// Concrete decode
// ----------------------------------------------------------------------

#[test]
fn decode_variant_accepts_missing_tag() {
    let circle = decode_variant::<Circle>(json!({"radius": 2.0})).expect("tag may be absent");

    assert_eq!(circle.radius, 2.0);
}

#[test]
fn decode_variant_rejects_wrong_tag() {
    let err = decode_variant::<Circle>(json!({"kind": "square", "radius": 2.0}))
        .expect_err("tag must match");

    assert!(matches!(
        err.record_error(),
        Some(RecordError::TagMismatch { field: "kind", expected: "circle", .. })
    ));
}

#[test]
fn nested_adaptive_failure_keeps_its_typed_error() {
    let registry = fixture_registry();
    let raw = json!({
        "type": "callout",
        "callout": { "text": "hi", "icon": { "kind": "hexagon" } }
    });

    let err = with_registry(&registry, || decode_variant::<Callout>(raw))
        .expect_err("nested icon is unknown");

    assert!(
        matches!(
            err.registry_error(),
            Some(RegistryError::UnknownDiscriminator { value: Some(value), .. }) if value == "hexagon"
        ),
        "unexpected error: {err:?}"
    );
}

// ----------------------------------------------------------------------
// Encode
// ----------------------------------------------------------------------

#[test]
fn encode_injects_tag_and_fixed_fields() {
    let callout = Callout {
        callout: CalloutBody {
            text: "note".to_string(),
            icon: Some(Adaptive::new(Circle {
                radius: 1.0,
                label: None,
            })),
        },
    };

    let value = callout.to_value().expect("encode");

    assert_eq!(
        value,
        json!({
            "type": "callout",
            "object": "note",
            "callout": { "text": "note", "icon": { "kind": "circle", "radius": 1.0 } }
        })
    );
}

#[test]
fn adaptive_round_trips_through_json_text() {
    let registry = fixture_registry();
    let record = Adaptive::<NoteRoot>::new(Callout {
        callout: CalloutBody {
            text: "round".to_string(),
            icon: Some(Adaptive::new(Square { side: 2.0 })),
        },
    });

    let text = record.to_json_string().expect("encode");
    let decoded = with_registry(&registry, || Adaptive::<NoteRoot>::from_json_str(&text))
        .expect("decode");

    assert_eq!(decoded, record);
}

// ----------------------------------------------------------------------
// Refresh
// ----------------------------------------------------------------------

#[test]
fn refresh_overwrites_only_present_fields() {
    let mut point = Point { x: 1, y: 2 };
    point.refresh(json!({"x": 5})).expect("merge");

    assert_eq!(point, Point { x: 5, y: 2 });
}

#[test]
fn refresh_rejects_tag_change_and_leaves_record_unchanged() {
    let mut point = Point { x: 1, y: 2 };
    let err = point
        .refresh(json!({"kind": "circle", "x": 9}))
        .expect_err("tag is immutable");

    assert_eq!(err.origin, ErrorOrigin::Patch);
    assert!(matches!(
        err.patch_error(),
        Some(crate::patch::MergePatchError::ImmutableField { field: "kind", expected: "point", .. })
    ));
    assert_eq!(point, Point { x: 1, y: 2 });
}

#[test]
fn refresh_revalidates_merged_record() {
    let mut point = Point { x: 1, y: 2 };
    let err = point
        .refresh(json!({"y": "not a number"}))
        .expect_err("y must stay numeric");

    assert!(matches!(err.record_error(), Some(RecordError::Decode { .. })));
    assert_eq!(point, Point { x: 1, y: 2 });
}

#[test]
fn adaptive_refresh_merges_into_concrete_value() {
    let mut record = Adaptive::<ShapeRoot>::new(Point { x: 1, y: 2 });
    record.refresh(json!({"y": 7})).expect("merge");

    assert_eq!(record.downcast_ref::<Point>(), Some(&Point { x: 1, y: 7 }));
}

// ----------------------------------------------------------------------
// Payload access & compose
// ----------------------------------------------------------------------

#[test]
fn payload_reads_object_under_tag_value() {
    let callout = Callout {
        callout: CalloutBody {
            text: "inside".to_string(),
            icon: None,
        },
    };

    assert_eq!(callout.payload().expect("payload"), json!({"text": "inside"}));
    assert_eq!(callout.payload_field("text").expect("text"), json!("inside"));
    assert_eq!(callout.nested().text, "inside");

    let err = callout.payload_field("icon").expect_err("icon is unset");
    assert!(matches!(
        err.record_error(),
        Some(RecordError::FieldAccess { field, .. }) if field == "callout.icon"
    ));
}

#[test]
fn payload_missing_on_flat_variant_is_field_access_error() {
    let err = Point { x: 0, y: 0 }.payload().expect_err("no 'point' key");

    assert!(matches!(
        err.record_error(),
        Some(RecordError::FieldAccess { .. })
    ));
}

#[test]
fn compose_builds_from_natural_values() {
    let circle = Circle::compose_from(2.5).expect("compose from one number");
    assert_eq!(circle.radius, 2.5);

    let labelled = Circle::compose_from(vec![ComposeArg::from(1.0), ComposeArg::from("dot")])
        .expect("compose spreads lists");
    assert_eq!(labelled.label.as_deref(), Some("dot"));
}

#[test]
fn compose_on_plain_variant_is_not_composable() {
    let err = Square::compose_from(1.0).expect_err("square has no composer");

    assert!(matches!(
        err.record_error(),
        Some(RecordError::NotComposable { type_name: "Square" })
    ));
}

#[test]
fn adaptive_compose_looks_up_by_discriminator_value() {
    let registry = fixture_registry();
    let record = with_registry(&registry, || Adaptive::<ShapeRoot>::compose("circle", 3.0))
        .expect("compose circle");

    assert_eq!(record.downcast_ref::<Circle>().map(|c| c.radius), Some(3.0));
}
