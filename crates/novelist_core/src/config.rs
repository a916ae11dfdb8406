//! Workspace configuration.
//!
//! # Responsibility
//! - Merge built-in defaults, an optional TOML file, and `NOVELIST_*`
//!   environment variables into one `StudioConfig`.
//! - Reject values the core cannot run with.
//!
//! Precedence, highest first:
//! 1. Environment (`NOVELIST_` prefix, `__` between section and key), e.g.
//!    `NOVELIST_AUTOSAVE__INTERVAL_SECS=30`.
//! 2. Config file (`novelist.toml` / `novelist.local.toml`, or an explicit path).
//! 3. Defaults.

use crate::model::tree::DEFAULT_WRITING_GOAL;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE_NAMES: &[&str] = &["novelist", "novelist.local"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StudioConfig {
    pub storage: StorageConfig,
    pub autosave: AutoSaveConfig,
    pub writing: WritingConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// JSON snapshot of every project.
    pub data_file: PathBuf,
    /// Directory for plain-text exports.
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutoSaveConfig {
    pub interval_secs: u64,
    /// Also export the active project as text on each tick.
    pub export_text: bool,
}

impl AutoSaveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WritingConfig {
    /// Daily goal for newly created projects.
    pub default_goal: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    pub level: String,
    /// Absolute directory for rolling log files. Logging stays off when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Loads configuration from defaults, file, and environment.
///
/// `path` forces a specific (required) config file; otherwise the default
/// names are looked up in the working directory and may be absent.
pub fn load_config(path: Option<&Path>) -> Result<StudioConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("storage.data_file", "novels_data.json")?
        .set_default("storage.export_dir", "exports")?
        .set_default("autosave.interval_secs", 60)?
        .set_default("autosave.export_text", false)?
        .set_default("writing.default_goal", i64::from(DEFAULT_WRITING_GOAL))?
        .set_default("log.level", "info")?;

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("NOVELIST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config: StudioConfig = builder.build()?.try_deserialize()?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &StudioConfig) -> Result<(), ConfigError> {
    if config.storage.data_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "storage.data_file cannot be empty".to_string(),
        ));
    }
    if config.autosave.interval_secs == 0 {
        return Err(ConfigError::Validation(
            "autosave.interval_secs must be positive".to_string(),
        ));
    }
    if config.writing.default_goal == 0 {
        return Err(ConfigError::Validation(
            "writing.default_goal must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::load_config;
    use std::io::Write;

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp config file");
        writeln!(
            file,
            "[autosave]\ninterval_secs = 15\nexport_text = true\n\n[writing]\ndefault_goal = 3000\n"
        )
        .expect("write config");

        let config = load_config(Some(file.path())).expect("config should load");
        assert_eq!(config.autosave.interval_secs, 15);
        assert!(config.autosave.export_text);
        assert_eq!(config.writing.default_goal, 3000);
        assert_eq!(config.storage.data_file.to_str(), Some("novels_data.json"));
        assert_eq!(config.log.level, "info");
        assert!(config.log.dir.is_none());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp config file");
        writeln!(file, "[autosave]\ninterval_secs = 0\n").expect("write config");

        let err = load_config(Some(file.path())).expect_err("zero interval must fail");
        assert!(err.to_string().contains("interval_secs"));
    }

    #[test]
    fn missing_explicit_file_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.toml");
        assert!(load_config(Some(&missing)).is_err());
    }
}
