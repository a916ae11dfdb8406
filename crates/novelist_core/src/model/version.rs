//! Version snapshots of episode text.
//!
//! # Responsibility
//! - Keep an append-only history of episode bodies per episode slot.
//! - Renumber or prune history when the chapter tree shrinks.
//!
//! # Invariants
//! - A `Version` is never edited or reordered after creation.
//! - `history` never fails; unknown keys yield an empty slice.
//! - After `remove_chapter` / `remove_episode`, every history is still keyed
//!   by the position of the episode it was taken from.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Display and persistence format for version timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Stage of the manuscript a snapshot was taken at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionKind {
    Draft,
    Proofread,
}

impl VersionKind {
    /// Persisted tag (`draft` / `proofread`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Proofread => "proofread",
        }
    }

    /// Human-readable prefix used in version labels.
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Proofread => "Proofread",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "proofread" => Some(Self::Proofread),
            _ => None,
        }
    }
}

/// Immutable snapshot of one episode body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    kind: VersionKind,
    label: String,
    content: String,
    created_at: NaiveDateTime,
}

impl Version {
    /// Creates a snapshot labelled `"<Draft|Proofread> - <timestamp>"`.
    pub fn new(kind: VersionKind, content: impl Into<String>, created_at: NaiveDateTime) -> Self {
        let created_at = created_at.with_nanosecond(0).unwrap_or(created_at);
        let label = format!("{} - {}", kind.label(), created_at.format(TIMESTAMP_FORMAT));
        Self::from_parts(kind, label, content, created_at)
    }

    pub(crate) fn from_parts(
        kind: VersionKind,
        label: impl Into<String>,
        content: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            kind,
            label: label.into(),
            content: content.into(),
            created_at,
        }
    }

    pub fn kind(&self) -> VersionKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Timestamp rendered in `TIMESTAMP_FORMAT`.
    pub fn timestamp_text(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Position of an episode inside its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionKey {
    pub chapter: usize,
    pub episode: usize,
}

impl VersionKey {
    pub fn new(chapter: usize, episode: usize) -> Self {
        Self { chapter, episode }
    }
}

/// Append-only version histories keyed by episode position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionStore {
    entries: BTreeMap<VersionKey, Vec<Version>>,
}

impl VersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot stamped with the current local time.
    pub fn snapshot(
        &mut self,
        chapter: usize,
        episode: usize,
        kind: VersionKind,
        content: impl Into<String>,
    ) {
        self.snapshot_at(chapter, episode, kind, content, Local::now().naive_local());
    }

    /// Appends a snapshot with a caller-provided timestamp.
    pub fn snapshot_at(
        &mut self,
        chapter: usize,
        episode: usize,
        kind: VersionKind,
        content: impl Into<String>,
        created_at: NaiveDateTime,
    ) {
        self.entries
            .entry(VersionKey::new(chapter, episode))
            .or_default()
            .push(Version::new(kind, content, created_at));
    }

    /// History for one episode slot in append order.
    pub fn history(&self, chapter: usize, episode: usize) -> &[Version] {
        self.entries
            .get(&VersionKey::new(chapter, episode))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates non-empty histories in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&VersionKey, &[Version])> {
        self.entries
            .iter()
            .map(|(key, versions)| (key, versions.as_slice()))
    }

    /// Total number of snapshots across all keys.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn insert_history(&mut self, key: VersionKey, versions: Vec<Version>) {
        if versions.is_empty() {
            return;
        }
        self.entries.entry(key).or_default().extend(versions);
    }

    /// Drops histories of a removed chapter and shifts later chapters down.
    ///
    /// Returns the number of pruned snapshots.
    pub(crate) fn remove_chapter(&mut self, chapter: usize) -> usize {
        let mut pruned = 0;
        let entries = std::mem::take(&mut self.entries);
        for (key, versions) in entries {
            match key.chapter.cmp(&chapter) {
                Ordering::Less => {
                    self.entries.insert(key, versions);
                }
                Ordering::Equal => pruned += versions.len(),
                Ordering::Greater => {
                    self.entries
                        .insert(VersionKey::new(key.chapter - 1, key.episode), versions);
                }
            }
        }
        pruned
    }

    /// Drops the history of a removed episode and shifts its later siblings.
    ///
    /// Returns the number of pruned snapshots.
    pub(crate) fn remove_episode(&mut self, chapter: usize, episode: usize) -> usize {
        let mut pruned = 0;
        let entries = std::mem::take(&mut self.entries);
        for (key, versions) in entries {
            if key.chapter != chapter {
                self.entries.insert(key, versions);
                continue;
            }
            match key.episode.cmp(&episode) {
                Ordering::Less => {
                    self.entries.insert(key, versions);
                }
                Ordering::Equal => pruned += versions.len(),
                Ordering::Greater => {
                    self.entries
                        .insert(VersionKey::new(key.chapter, key.episode - 1), versions);
                }
            }
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::{VersionKey, VersionKind, VersionStore};
    use chrono::NaiveDate;

    fn at(hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|day| day.and_hms_opt(hour, 0, 0))
            .expect("valid test timestamp")
    }

    #[test]
    fn label_uses_kind_prefix_and_timestamp() {
        let mut store = VersionStore::new();
        store.snapshot_at(0, 0, VersionKind::Proofread, "text", at(9));
        let history = store.history(0, 0);
        assert_eq!(history[0].label(), "Proofread - 2024/05/01 09:00:00");
        assert_eq!(history[0].timestamp_text(), "2024/05/01 09:00:00");
    }

    #[test]
    fn remove_chapter_prunes_and_shifts_keys() {
        let mut store = VersionStore::new();
        store.snapshot_at(0, 0, VersionKind::Draft, "a", at(1));
        store.snapshot_at(1, 0, VersionKind::Draft, "b", at(2));
        store.snapshot_at(2, 3, VersionKind::Draft, "c", at(3));

        assert_eq!(store.remove_chapter(1), 1);

        assert_eq!(store.history(0, 0)[0].content(), "a");
        assert_eq!(store.history(1, 3)[0].content(), "c");
        assert!(store.history(2, 3).is_empty());
        let keys: Vec<VersionKey> = store.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![VersionKey::new(0, 0), VersionKey::new(1, 3)]);
    }

    #[test]
    fn remove_episode_only_touches_its_chapter() {
        let mut store = VersionStore::new();
        store.snapshot_at(0, 2, VersionKind::Draft, "other chapter", at(1));
        store.snapshot_at(1, 0, VersionKind::Draft, "gone", at(2));
        store.snapshot_at(1, 2, VersionKind::Draft, "moves", at(3));

        assert_eq!(store.remove_episode(1, 0), 1);

        assert_eq!(store.history(0, 2)[0].content(), "other chapter");
        assert_eq!(store.history(1, 1)[0].content(), "moves");
        assert_eq!(store.len(), 2);
    }
}
