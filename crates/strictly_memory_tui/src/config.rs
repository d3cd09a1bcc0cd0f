//! Terminal host configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strictly_memory::GridSize;
use tracing::{debug, info, instrument};

/// Configuration for the terminal game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Grid size used when neither the command line nor the flag store
    /// names one (e.g. "4" or "4x6").
    #[serde(default = "default_rows")]
    default_rows: String,

    /// File holding persisted flags.
    #[serde(default = "default_state_file")]
    state_file: PathBuf,

    /// File receiving logs while the terminal UI is up.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_rows() -> String {
    GridSize::default().rows().to_string()
}

fn default_state_file() -> PathBuf {
    PathBuf::from("strictly_memory_state.toml")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_memory.log")
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            default_rows: default_rows(),
            state_file: default_state_file(),
            log_file: default_log_file(),
            log_filter: default_log_filter(),
        }
    }
}

impl TuiConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(default_rows = %config.default_rows, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, falling back to defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.as_ref().display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// The configured default grid size.
    pub fn grid_size(&self) -> GridSize {
        GridSize::from_label(&self.default_rows)
    }

    /// Replaces the flag store location.
    pub fn with_state_file(mut self, state_file: PathBuf) -> Self {
        self.state_file = state_file;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TuiConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, TuiConfig::default());
        assert_eq!(config.grid_size(), GridSize::Standard);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_rows = \"6\"").unwrap();

        let config = TuiConfig::from_file(file.path()).unwrap();
        assert_eq!(config.grid_size(), GridSize::Large);
        assert_eq!(config.state_file(), &default_state_file());
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_unknown_rows_fall_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_rows = \"7\"").unwrap();

        let config = TuiConfig::from_file(file.path()).unwrap();
        assert_eq!(config.grid_size(), GridSize::Standard);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_rows = [").unwrap();

        let err = TuiConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }
}
