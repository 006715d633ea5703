use crate::{
    core::model::{Adaptive, ComposeArgs, Hierarchy, Path, RecordError, Tag, Variant},
    schema::reference::ObjectRef,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

///
/// ParentRoot
/// Where a page, database or block lives, selected by `type`.
///

pub enum ParentRoot {}

impl Path for ParentRoot {
    const PATH: &'static str = "polydoc::parent";
}

impl Hierarchy for ParentRoot {}

// Parent types are composed from an id or a link to the parent.
macro_rules! id_parent {
    ($(#[$meta:meta])* $name:ident, $field:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
        pub struct $name {
            pub $field: Uuid,
        }

        impl Variant for $name {
            type Root = ParentRoot;

            const TAG: Tag = Tag::new("type", stringify!($field));

            fn compose(args: ComposeArgs) -> Result<Self, RecordError> {
                args.expect_at_most(1)?;

                Ok(Self {
                    $field: ObjectRef::parse(args.text(0)?)?.id,
                })
            }
        }
    };
}

id_parent!(
    ///
    /// DatabaseParent
    ///
    DatabaseParent,
    database_id
);

id_parent!(
    ///
    /// PageParent
    ///
    PageParent,
    page_id
);

id_parent!(
    ///
    /// BlockParent
    ///
    BlockParent,
    block_id
);

///
/// WorkspaceParent
/// Top-level pages have no parent id.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WorkspaceParent {
    #[serde(default = "workspace_flag")]
    pub workspace: bool,
}

impl Default for WorkspaceParent {
    fn default() -> Self {
        Self { workspace: true }
    }
}

const fn workspace_flag() -> bool {
    true
}

impl Variant for WorkspaceParent {
    type Root = ParentRoot;

    const TAG: Tag = Tag::new("type", "workspace");
}

/// Id of the parent object, or `None` for the workspace.
#[must_use]
pub fn parent_id(parent: &Adaptive<ParentRoot>) -> Option<Uuid> {
    if let Some(parent) = parent.downcast_ref::<DatabaseParent>() {
        return Some(parent.database_id);
    }
    if let Some(parent) = parent.downcast_ref::<PageParent>() {
        return Some(parent.page_id);
    }

    parent
        .downcast_ref::<BlockParent>()
        .map(|parent| parent.block_id)
}
