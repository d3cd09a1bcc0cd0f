//! Persisted flags: small string values the host remembers between runs.
//!
//! Storage is best effort. A store that cannot be read starts empty and a
//! failed write is logged, never surfaced to the player.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Flag set once the welcome splash has been dismissed.
pub const SPLASH_SEEN: &str = "splash_seen";

/// Last grid size the player chose.
pub const GRID_ROWS: &str = "grid_rows";

/// Key/value flag storage.
pub trait FlagStore {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&mut self, key: &str, value: &str);

    /// Whether `key` holds an affirmative value (`"yes"` or `"ok"`).
    fn is_set(&self, key: &str) -> bool {
        matches!(self.get(key).as_deref(), Some("yes" | "ok"))
    }
}

/// Flags held in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlags {
    values: BTreeMap<String, String>,
}

impl MemoryFlags {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlags {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Flags kept in a TOML table on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileFlags {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileFlags {
    /// Opens the store at `path`. A missing or unreadable file yields an
    /// empty store.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(error = %e, "Flag store is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) => {
                debug!(error = %e, "No flag store yet");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn save(&self) -> anyhow::Result<()> {
        let content = toml::to_string(&self.values)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl FlagStore for FileFlags {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    #[instrument(skip(self))]
    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        match self.save() {
            Ok(()) => debug!("Flag saved"),
            Err(e) => warn!(error = %e, "Failed to save flag"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_flags() {
        let mut flags = MemoryFlags::new();
        assert!(!flags.is_set(SPLASH_SEEN));
        flags.set(SPLASH_SEEN, "yes");
        assert!(flags.is_set(SPLASH_SEEN));
        flags.set(GRID_ROWS, "6");
        assert_eq!(flags.get(GRID_ROWS).as_deref(), Some("6"));
        assert!(!flags.is_set(GRID_ROWS));
    }

    #[test]
    fn test_file_flags_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");

        let mut flags = FileFlags::open(&path);
        assert_eq!(flags.get(GRID_ROWS), None);
        flags.set(GRID_ROWS, "8");
        flags.set(SPLASH_SEEN, "yes");

        let reopened = FileFlags::open(&path);
        assert_eq!(reopened.get(GRID_ROWS).as_deref(), Some("8"));
        assert!(reopened.is_set(SPLASH_SEEN));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let flags = FileFlags::open(&path);
        assert_eq!(flags.get(SPLASH_SEEN), None);
    }

    #[test]
    fn test_unwritable_store_keeps_value_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("state.toml");

        let mut flags = FileFlags::open(&path);
        flags.set(SPLASH_SEEN, "yes");
        assert!(flags.is_set(SPLASH_SEEN));
        assert!(!path.exists());
    }
}
