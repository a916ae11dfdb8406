//! Chapter, episode and reference-note records.
//!
//! # Responsibility
//! - Define the leaf records of a project's manuscript tree.
//! - Own the episode character-count cache and its recompute rule.
//!
//! # Invariants
//! - `NodeId` is generated once at creation and never reassigned.
//! - `Episode::word_count` equals `committed_length(body)` after every commit
//!   and after every load.
//! - Characters and settings carry no links into the chapter tree.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier for chapters and episodes.
///
/// Stored as text so identifiers written by older tools (timestamps) load
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Character count used for progress tracking.
///
/// Leading/trailing whitespace is excluded, inner whitespace is counted.
pub fn committed_length(body: &str) -> usize {
    body.trim().chars().count()
}

/// Title and body currently shown in an editor.
///
/// The model never holds an uncommitted buffer; callers pass theirs in when
/// an operation must flush it first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub title: String,
    pub body: String,
}

impl EditBuffer {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Single writable unit of prose inside a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    id: NodeId,
    title: String,
    body: String,
    memo: String,
    word_count: usize,
}

impl Episode {
    /// Creates an empty episode with a generated id.
    pub(crate) fn new(title: impl Into<String>) -> Self {
        Self::from_parts(NodeId::generate(), title, String::new(), String::new())
    }

    /// Rebuilds an episode from stored parts, recomputing the count cache.
    pub(crate) fn from_parts(
        id: NodeId,
        title: impl Into<String>,
        body: impl Into<String>,
        memo: impl Into<String>,
    ) -> Self {
        let body = body.into();
        let word_count = committed_length(&body);
        Self {
            id,
            title: title.into(),
            body,
            memo: memo.into(),
            word_count,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Cached character count of the last committed body.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Returns the committed title/body as an editor buffer.
    pub fn to_buffer(&self) -> EditBuffer {
        EditBuffer::new(self.title.clone(), self.body.clone())
    }

    pub(crate) fn commit(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.title = title.into();
        self.body = body.into();
        self.word_count = committed_length(&self.body);
    }

    pub(crate) fn set_memo(&mut self, memo: impl Into<String>) {
        self.memo = memo.into();
    }
}

/// Top-level narrative unit holding an ordered list of episodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    id: NodeId,
    title: String,
    pub(crate) episodes: Vec<Episode>,
}

impl Chapter {
    pub(crate) fn new(title: impl Into<String>) -> Self {
        Self::from_parts(NodeId::generate(), title, Vec::new())
    }

    pub(crate) fn from_parts(id: NodeId, title: impl Into<String>, episodes: Vec<Episode>) -> Self {
        Self {
            id,
            title: title.into(),
            episodes,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn episode(&self, index: usize) -> Option<&Episode> {
        self.episodes.get(index)
    }

    /// Sum of the cached counts of all contained episodes.
    pub fn word_total(&self) -> usize {
        self.episodes.iter().map(Episode::word_count).sum()
    }
}

/// Character sheet kept as reference material.
///
/// `age` is free text ("early 30s" is as valid as "31").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub background: String,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        personality: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            personality: personality.into(),
            background: background.into(),
        }
    }

    /// Renders the read-only profile sheet.
    pub fn profile_text(&self) -> String {
        format!(
            "Name: {}\nAge: {}\nPersonality: {}\n\nBackground:\n{}\n",
            self.name, self.age, self.personality, self.background
        )
    }
}

/// World-building note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub detail: String,
}

impl Setting {
    pub fn new(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
        }
    }
}
