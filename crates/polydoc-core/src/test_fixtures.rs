//! Small hierarchies shared by the core unit tests.

use crate::model::{
    compose::ComposeArgs,
    record::{Adaptive, RecordError},
    registry::{TypeRegistry, VariantEntry},
    variant::{Hierarchy, Nested, Path, Tag, Variant},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

///
/// ShapeRoot
///

pub(crate) enum ShapeRoot {}

impl Path for ShapeRoot {
    const PATH: &'static str = "test::shape";
}

impl Hierarchy for ShapeRoot {}

///
/// Circle
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct Circle {
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Variant for Circle {
    type Root = ShapeRoot;

    const TAG: Tag = Tag::new("kind", "circle");

    fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
        args.expect_at_most(2)?;

        Ok(Self {
            radius: args.number(0)?,
            label: args.optional_text(1)?.map(str::to_string),
        })
    }
}

///
/// Square
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct Square {
    pub side: f64,
}

impl Variant for Square {
    type Root = ShapeRoot;

    const TAG: Tag = Tag::new("kind", "square");
}

///
/// Point
/// Plain variant used for shallow merge checks.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct Point {
    pub x: i64,
    pub y: i64,
}

impl Variant for Point {
    type Root = ShapeRoot;

    const TAG: Tag = Tag::new("kind", "point");
}

///
/// NoteRoot
///

pub(crate) enum NoteRoot {}

impl Path for NoteRoot {
    const PATH: &'static str = "test::note";
}

impl Hierarchy for NoteRoot {}

///
/// Callout
/// Keeps its fields under `"callout": { ... }` and holds a nested shape.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct Callout {
    pub callout: CalloutBody,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct CalloutBody {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Adaptive<ShapeRoot>>,
}

impl Variant for Callout {
    type Root = NoteRoot;

    const TAG: Tag = Tag::new("type", "callout");
    const FIXED: &'static [Tag] = &[Tag::new("object", "note")];
}

impl Nested for Callout {
    type Payload = CalloutBody;

    fn nested(&self) -> &CalloutBody {
        &self.callout
    }

    fn nested_mut(&mut self) -> &mut CalloutBody {
        &mut self.callout
    }
}

///
/// AnyRoot
/// Top-level hierarchy that routes `object = "shape"` into `ShapeRoot`.
///

pub(crate) enum AnyRoot {}

impl Path for AnyRoot {
    const PATH: &'static str = "test::any";
}

impl Hierarchy for AnyRoot {}

/// Registry with every fixture type registered.
pub(crate) fn fixture_registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::new();

    registry.register::<Circle>().expect("register circle");
    registry.register::<Square>().expect("register square");
    registry.register::<Point>().expect("register point");
    registry.register::<Callout>().expect("register callout");
    registry
        .register_entry(
            AnyRoot::PATH,
            "object",
            "shape",
            VariantEntry::delegate::<ShapeRoot>(),
        )
        .expect("register shape delegate");

    Arc::new(registry)
}
