//! Core domain logic for Novelist.
//! This crate is the single source of truth for manuscript invariants.

pub mod analysis;
pub mod autosave;
pub mod config;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod service;

pub use analysis::{
    find_repetitions, punctuation_issues, script_balance, AnalysisError, PunctuationIssue,
    PunctuationIssueKind, PunctuationReport, Repetition, ScriptBalance, ScriptShare, Verdict,
};
pub use autosave::{
    export_file_name, run_autosave_once, spawn_autosave, AutoSaveHandle, AutoSaveSchedule,
    AutoSaveTarget, SharedRegistry,
};
pub use config::{load_config, ConfigError, StudioConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{Chapter, Character, EditBuffer, Episode, NodeId, Setting};
pub use model::error::{DocumentError, DocumentResult, Target};
pub use model::project::Project;
pub use model::tree::{ChapterSummary, DocumentTree, DEFAULT_WRITING_GOAL};
pub use model::version::{Version, VersionKey, VersionKind, VersionStore};
pub use persistence::export::{export_text, render_project_text};
pub use persistence::gateway::{from_json, to_json, LoadOutcome, PersistenceGateway};
pub use persistence::SnapshotError;
pub use service::progress::{goal_progress, progress_report, ProgressReport};
pub use service::registry::ProjectRegistry;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
