//! Snapshot file gateway.
//!
//! # Responsibility
//! - Encode/decode the registry as pretty UTF-8 JSON.
//! - Write snapshot files atomically and load them with fallback.
//!
//! # Invariants
//! - A failed save leaves the previous file intact.
//! - `load_or_empty` never returns a partially applied registry.

use super::snapshot::{registry_from_snapshot, registry_to_snapshot, SnapshotFile};
use super::SnapshotError;
use crate::service::registry::ProjectRegistry;
use log::{error, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Encodes the whole registry. Non-ASCII text is written verbatim.
pub fn to_json(registry: &ProjectRegistry) -> Result<String, SnapshotError> {
    let snapshot = registry_to_snapshot(registry);
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Decodes a registry, validating every index.
pub fn from_json(text: &str) -> Result<ProjectRegistry, SnapshotError> {
    let snapshot: SnapshotFile =
        serde_json::from_str(text).map_err(|err| SnapshotError::Malformed(err.to_string()))?;
    registry_from_snapshot(snapshot)
}

/// Result of a load that must not fail.
#[derive(Debug)]
pub struct LoadOutcome {
    pub registry: ProjectRegistry,
    /// Set when the stored snapshot was unusable and was ignored.
    pub error: Option<SnapshotError>,
}

/// Reads and writes the snapshot file of one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceGateway {
    data_file: PathBuf,
}

impl PersistenceGateway {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Writes the registry through a temp file in the same directory.
    ///
    /// # Side effects
    /// - Emits `snapshot_save` logging events with duration and status.
    pub fn save(&self, registry: &ProjectRegistry) -> Result<(), SnapshotError> {
        let started_at = Instant::now();
        let payload = to_json(registry)?;
        match write_atomically(&self.data_file, payload.as_bytes()) {
            Ok(()) => {
                info!(
                    "event=snapshot_save module=persistence status=ok projects={} bytes={} duration_ms={}",
                    registry.len(),
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=snapshot_save module=persistence status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Loads the snapshot. `Ok(None)` when no file exists yet.
    pub fn load(&self) -> Result<Option<ProjectRegistry>, SnapshotError> {
        let started_at = Instant::now();
        let text = match std::fs::read_to_string(&self.data_file) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("event=snapshot_load module=persistence status=skip reason=missing_file");
                return Ok(None);
            }
            Err(err) => return Err(SnapshotError::io(&self.data_file, err)),
        };

        let registry = from_json(&text)?;
        info!(
            "event=snapshot_load module=persistence status=ok projects={} duration_ms={}",
            registry.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Some(registry))
    }

    /// Loads the snapshot, falling back to an empty registry.
    ///
    /// The error, if any, is handed back so the caller can surface it.
    pub fn load_or_empty(&self) -> LoadOutcome {
        match self.load() {
            Ok(registry) => LoadOutcome {
                registry: registry.unwrap_or_default(),
                error: None,
            },
            Err(err) => {
                error!(
                    "event=snapshot_load module=persistence status=error fallback=empty error={}",
                    err
                );
                LoadOutcome {
                    registry: ProjectRegistry::new(),
                    error: Some(err),
                }
            }
        }
    }
}

pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), SnapshotError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|err| SnapshotError::io(dir, err))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| SnapshotError::io(dir, err))?;
    temp.write_all(bytes)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|err| SnapshotError::io(temp.path(), err))?;
    temp.persist(path)
        .map_err(|err| SnapshotError::io(path, err.error))?;
    Ok(())
}
