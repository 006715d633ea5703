use crate::core::{
    model::{Hierarchy, Nested, Path, Tag, Variant},
    serialize::JsonObject,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const USER_OBJECT: Tag = Tag::new("object", "user");

///
/// UserRoot
/// People and bots, selected by `type`.
///

pub enum UserRoot {}

impl Path for UserRoot {
    const PATH: &'static str = "polydoc::user";
}

impl Hierarchy for UserRoot {}

///
/// PartialUser
/// User reference as it appears on `created_by` and in mentions.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PartialUser {
    pub id: Uuid,
}

///
/// Person
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Person {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub person: PersonData,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PersonData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Variant for Person {
    type Root = UserRoot;

    const TAG: Tag = Tag::new("type", "person");
    const FIXED: &'static [Tag] = &[USER_OBJECT];
}

impl Nested for Person {
    type Payload = PersonData;

    fn nested(&self) -> &PersonData {
        &self.person
    }

    fn nested_mut(&mut self) -> &mut PersonData {
        &mut self.person
    }
}

///
/// Bot
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Bot {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bot: JsonObject,
}

impl Variant for Bot {
    type Root = UserRoot;

    const TAG: Tag = Tag::new("type", "bot");
    const FIXED: &'static [Tag] = &[USER_OBJECT];
}
