//! Project record: a named manuscript with its document tree.

use crate::model::tree::DocumentTree;

/// One manuscript. Names are free text and need not be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub tree: DocumentTree,
}

impl Project {
    /// Creates an empty project using the default writing goal.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tree: DocumentTree::new(),
        }
    }

    pub(crate) fn from_parts(name: impl Into<String>, tree: DocumentTree) -> Self {
        Self {
            name: name.into(),
            tree,
        }
    }
}
