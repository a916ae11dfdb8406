//! Snapshot persistence and text export.
//!
//! # Responsibility
//! - Convert the registry to and from the flat JSON snapshot layout.
//! - Write snapshots atomically and read them back with full validation.
//! - Render a project as plain text for export.
//!
//! # Invariants
//! - A snapshot is applied completely or not at all.
//! - Loaded episode counts are recomputed from their bodies.

pub mod export;
pub mod gateway;
pub mod snapshot;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from snapshot encoding, decoding and file access.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Data failed to parse or has inconsistent indices.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
    /// File-system failure while reading or writing.
    #[error("snapshot i/o failed at `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Encoding failure.
    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
