//! Top-level API objects, selected by `object`.
//!
//! Pages and databases are registered directly under [`RecordRoot`];
//! `object = "block"` and `object = "user"` are resolved a second time in
//! their own hierarchies by `type`.

use crate::{
    core::model::{Adaptive, Hierarchy, Path, Tag, Variant},
    schema::{
        file::FileRoot,
        parent::ParentRoot,
        property::{PropertyRoot, TitleValue},
        text::{RichText, plain_text},
        user::PartialUser,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use uuid::Uuid;

///
/// RecordRoot
///

pub enum RecordRoot {}

impl Path for RecordRoot {
    const PATH: &'static str = "polydoc::record";
}

impl Hierarchy for RecordRoot {}

///
/// Page
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Adaptive<ParentRoot>>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Adaptive<FileRoot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Adaptive<FileRoot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<PartialUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<PartialUser>,
    #[serde(default)]
    pub properties: BTreeMap<String, Adaptive<PropertyRoot>>,
}

impl Variant for Page {
    type Root = RecordRoot;

    const TAG: Tag = Tag::new("object", "page");
}

impl Page {
    #[must_use]
    pub fn new(parent: impl Into<Adaptive<ParentRoot>>) -> Self {
        Self {
            parent: Some(parent.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Adaptive<PropertyRoot>> {
        self.properties.get(name)
    }

    /// Property `name` as a concrete value type, if it has that type.
    #[must_use]
    pub fn property_as<T: Variant<Root = PropertyRoot>>(&self, name: &str) -> Option<&T> {
        self.property(name)?.downcast_ref::<T>()
    }

    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Adaptive<PropertyRoot>>,
    ) -> Option<Adaptive<PropertyRoot>> {
        self.properties.insert(name.into(), value.into())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<Adaptive<PropertyRoot>> {
        self.properties.remove(name)
    }

    /// Plain text of the page title.
    ///
    /// The title property is not always keyed by a fixed name, so every
    /// property is scanned for the one whose value is a title.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.properties
            .values()
            .find_map(|value| value.downcast_ref::<TitleValue>())
            .map(TitleValue::plain_text)
    }
}

///
/// Database
///
/// Property definitions are kept as raw JSON; only their values on pages
/// are modelled.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Database {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Adaptive<ParentRoot>>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub title: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<RichText>>,
    #[serde(default)]
    pub is_inline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Adaptive<FileRoot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, JsonValue>,
}

impl Variant for Database {
    type Root = RecordRoot;

    const TAG: Tag = Tag::new("object", "database");
}

impl Database {
    /// Plain text of the title, or `None` when it is empty.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        if self.title.is_empty() {
            return None;
        }

        Some(plain_text(&self.title))
    }
}
