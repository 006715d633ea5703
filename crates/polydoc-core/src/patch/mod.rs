//! Partial-update merge for raw record payloads.

pub mod merge;

pub use merge::{MergePatchError, is_noop, merge_object};
