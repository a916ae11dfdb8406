//! Structural and navigation errors for the document tree.

use std::fmt::{Display, Formatter};
use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Collection addressed by an index-based operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Project,
    Chapter,
    Episode,
    Character,
    Setting,
    Version,
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Project => "project",
            Self::Chapter => "chapter",
            Self::Episode => "episode",
            Self::Character => "character",
            Self::Setting => "setting",
            Self::Version => "version",
        };
        f.write_str(name)
    }
}

/// Failure signal for structural and navigation operations.
///
/// Operations returning this error leave the tree unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Index does not address an existing element.
    #[error("{target} index {index} out of range (len {len})")]
    OutOfRange {
        target: Target,
        index: usize,
        len: usize,
    },
    /// Operation needs a selected chapter.
    #[error("no active chapter")]
    NoActiveChapter,
    /// Operation needs an open episode.
    #[error("no active episode")]
    NoActiveEpisode,
    /// Registry has no project selected.
    #[error("no active project")]
    NoActiveProject,
    /// Daily goal must be a positive character count.
    #[error("writing goal must be positive, got {0}")]
    InvalidGoal(u32),
}

pub(crate) fn ensure_index(target: Target, index: usize, len: usize) -> DocumentResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(DocumentError::OutOfRange { target, index, len })
    }
}
