//! Concrete resource shapes for a Notion-style API.
//!
//! Call [`register_all`] (or [`registry`]) once at startup before decoding
//! anything from this module.

pub mod block;
pub mod file;
pub mod parent;
pub mod property;
pub mod record;
pub mod reference;
pub mod text;
pub mod user;


use crate::core::{
    error::InternalError,
    model::{Path, TypeRegistry, VariantEntry},
};

pub use block::{BlockRoot, TextBlock};
pub use file::FileRoot;
pub use parent::ParentRoot;
pub use property::PropertyRoot;
pub use record::{Database, Page, RecordRoot};
pub use reference::{ObjectRef, parse_object_id};
pub use text::{RichText, RichTextRoot};
pub use user::UserRoot;

/// Register every shape in this module.
pub fn register_all(registry: &mut TypeRegistry) -> Result<(), InternalError> {
    // rich text
    registry.register::<text::TextContent>()?;
    registry.register::<text::EquationContent>()?;
    registry.register::<text::MentionContent>()?;
    registry.register::<text::PageMention>()?;
    registry.register::<text::DatabaseMention>()?;
    registry.register::<text::UserMention>()?;
    registry.register::<text::DateMention>()?;

    // files
    registry.register::<file::Emoji>()?;
    registry.register::<file::ExternalFile>()?;
    registry.register::<file::HostedFile>()?;

    // parents
    registry.register::<parent::DatabaseParent>()?;
    registry.register::<parent::PageParent>()?;
    registry.register::<parent::BlockParent>()?;
    registry.register::<parent::WorkspaceParent>()?;

    // users
    registry.register::<user::Person>()?;
    registry.register::<user::Bot>()?;

    // blocks
    registry.register::<block::Paragraph>()?;
    registry.register::<block::Heading1>()?;
    registry.register::<block::Heading2>()?;
    registry.register::<block::Heading3>()?;
    registry.register::<block::Quote>()?;
    registry.register::<block::BulletedListItem>()?;
    registry.register::<block::NumberedListItem>()?;
    registry.register::<block::Toggle>()?;
    registry.register::<block::ToDo>()?;
    registry.register::<block::Callout>()?;
    registry.register::<block::Code>()?;
    registry.register::<block::Divider>()?;
    registry.register::<block::Equation>()?;
    registry.register::<block::Bookmark>()?;
    registry.register::<block::ChildPage>()?;

    // property values
    registry.register::<property::TitleValue>()?;
    registry.register::<property::RichTextValue>()?;
    registry.register::<property::NumberValue>()?;
    registry.register::<property::CheckboxValue>()?;
    registry.register::<property::SelectValue>()?;
    registry.register::<property::StatusValue>()?;
    registry.register::<property::MultiSelectValue>()?;
    registry.register::<property::DateValue>()?;
    registry.register::<property::UrlValue>()?;
    registry.register::<property::EmailValue>()?;
    registry.register::<property::PhoneNumberValue>()?;
    registry.register::<property::RelationValue>()?;

    // records
    registry.register::<record::Page>()?;
    registry.register::<record::Database>()?;
    registry.register_entry(
        RecordRoot::PATH,
        "object",
        "block",
        VariantEntry::delegate::<BlockRoot>(),
    )?;
    registry.register_entry(
        RecordRoot::PATH,
        "object",
        "user",
        VariantEntry::delegate::<UserRoot>(),
    )?;

    tracing::debug!(entries = registry.len(), "registered document schema");

    Ok(())
}

/// A fresh registry holding every shape in this module.
pub fn registry() -> Result<TypeRegistry, InternalError> {
    let mut registry = TypeRegistry::new();
    register_all(&mut registry)?;

    Ok(registry)
}
