//! Snapshot records and registry conversion.
//!
//! # Responsibility
//! - Mirror the on-disk JSON layout with serde records.
//! - Convert records to domain types, rejecting inconsistent data.
//!
//! # Invariants
//! - Version keys on disk are `"<chapter>_<episode>"`; in memory they are
//!   `VersionKey` pairs.
//! - Read paths reject invalid persisted state instead of masking it, except
//!   for orphaned version histories, which are pruned.

use super::SnapshotError;
use crate::model::document::{Chapter, Character, Episode, NodeId, Setting};
use crate::model::project::Project;
use crate::model::tree::{DocumentTree, DEFAULT_WRITING_GOAL};
use crate::model::version::{Version, VersionKey, VersionKind, VersionStore, TIMESTAMP_FORMAT};
use crate::service::registry::ProjectRegistry;
use chrono::NaiveDateTime;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static VERSION_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)_(\d+)$").expect("valid version key regex"));

fn default_writing_goal() -> u32 {
    DEFAULT_WRITING_GOAL
}

/// Whole-file snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub current_project_idx: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default)]
    pub chapters: Vec<ChapterRecord>,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub settings: Vec<Setting>,
    #[serde(default)]
    pub current_chapter: Option<usize>,
    #[serde(default)]
    pub current_episode: Option<usize>,
    #[serde(default = "default_writing_goal")]
    pub writing_goal: u32,
    #[serde(default)]
    pub versions: BTreeMap<String, Vec<VersionRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub episodes: Vec<EpisodeRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Serialized as `type` to match the file layout.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub content: String,
    pub timestamp: String,
}

/// Converts a registry into its snapshot records.
pub fn registry_to_snapshot(registry: &ProjectRegistry) -> SnapshotFile {
    SnapshotFile {
        projects: registry.projects().iter().map(project_to_record).collect(),
        current_project_idx: registry.active_index(),
    }
}

/// Builds a registry from snapshot records.
///
/// # Errors
/// - `Malformed` when any index, tag, or timestamp is inconsistent.
pub fn registry_from_snapshot(file: SnapshotFile) -> Result<ProjectRegistry, SnapshotError> {
    let projects = file
        .projects
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            project_from_record(record)
                .map_err(|message| SnapshotError::Malformed(format!("project {index}: {message}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    ProjectRegistry::from_parts(projects, file.current_project_idx)
        .map_err(SnapshotError::Malformed)
}

fn project_to_record(project: &Project) -> ProjectRecord {
    let tree = &project.tree;
    let chapters = tree
        .chapters()
        .iter()
        .map(|chapter| ChapterRecord {
            id: chapter.id().to_string(),
            title: chapter.title().to_string(),
            episodes: chapter
                .episodes()
                .iter()
                .map(|episode| EpisodeRecord {
                    id: episode.id().to_string(),
                    title: episode.title().to_string(),
                    content: episode.body().to_string(),
                    memo: episode.memo().to_string(),
                    word_count: episode.word_count(),
                })
                .collect(),
        })
        .collect();

    let versions = tree
        .versions()
        .iter()
        .map(|(key, history)| {
            (
                format!("{}_{}", key.chapter, key.episode),
                history.iter().map(version_to_record).collect(),
            )
        })
        .collect();

    ProjectRecord {
        name: project.name.clone(),
        chapters,
        characters: tree.characters().to_vec(),
        settings: tree.settings().to_vec(),
        current_chapter: tree.active_chapter(),
        current_episode: tree.active_episode(),
        writing_goal: tree.writing_goal(),
        versions,
    }
}

fn version_to_record(version: &Version) -> VersionRecord {
    VersionRecord {
        kind: version.kind().as_str().to_string(),
        name: version.label().to_string(),
        content: version.content().to_string(),
        timestamp: version.timestamp_text(),
    }
}

fn project_from_record(record: ProjectRecord) -> Result<Project, String> {
    let chapters: Vec<Chapter> = record
        .chapters
        .into_iter()
        .map(|chapter| {
            let episodes = chapter
                .episodes
                .into_iter()
                .map(episode_from_record)
                .collect();
            Chapter::from_parts(NodeId::from(chapter.id), chapter.title, episodes)
        })
        .collect();

    let mut versions = VersionStore::new();
    for (raw_key, history) in record.versions {
        let key = parse_version_key(&raw_key)?;
        let exists = chapters
            .get(key.chapter)
            .is_some_and(|chapter| key.episode < chapter.episodes().len());
        if !exists {
            warn!(
                "event=snapshot_load module=persistence status=skip reason=orphaned_versions key={raw_key} count={}",
                history.len()
            );
            continue;
        }
        let history = history
            .into_iter()
            .map(version_from_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|message| format!("versions[{raw_key}]: {message}"))?;
        versions.insert_history(key, history);
    }

    let tree = DocumentTree::from_parts(
        chapters,
        record.characters,
        record.settings,
        record.writing_goal,
        versions,
        record.current_chapter,
        record.current_episode,
    )?;
    Ok(Project::from_parts(record.name, tree))
}

fn episode_from_record(record: EpisodeRecord) -> Episode {
    let episode = Episode::from_parts(
        NodeId::from(record.id),
        record.title,
        record.content,
        record.memo,
    );
    if episode.word_count() != record.word_count {
        warn!(
            "event=snapshot_load module=persistence status=ok reason=stale_word_count stored={} recomputed={}",
            record.word_count,
            episode.word_count()
        );
    }
    episode
}

fn version_from_record(record: VersionRecord) -> Result<Version, String> {
    let kind = VersionKind::parse(&record.kind)
        .ok_or_else(|| format!("invalid version type `{}`", record.kind))?;
    let created_at = NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT)
        .map_err(|err| format!("invalid version timestamp `{}`: {err}", record.timestamp))?;
    Ok(Version::from_parts(kind, record.name, record.content, created_at))
}

fn parse_version_key(raw: &str) -> Result<VersionKey, String> {
    let invalid = || format!("invalid version key `{raw}`");
    let caps = VERSION_KEY_RE.captures(raw).ok_or_else(invalid)?;
    let chapter = caps[1].parse::<usize>().map_err(|_| invalid())?;
    let episode = caps[2].parse::<usize>().map_err(|_| invalid())?;
    Ok(VersionKey::new(chapter, episode))
}
