//! Typed object payloads stored in the object database.
//!
//! A stored object is `{type, size, payload}`; `type` is one of `blob`,
//! `tree`, `commit`, `tag`. The DB only cares about the type tag and raw
//! bytes; parsing the payload into a [`Tree`] or [`Commit`] is the job of
//! this module.

pub mod blob;
pub mod commit;
pub mod tree;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    pub fn parse(s: &str) -> Option<ObjectType> {
        match s {
            "blob" => Some(ObjectType::Blob),
            "tree" => Some(ObjectType::Tree),
            "commit" => Some(ObjectType::Commit),
            "tag" => Some(ObjectType::Tag),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub use blob::Blob;
pub use commit::Commit;
pub use tree::{Tree, TreeEntry};
