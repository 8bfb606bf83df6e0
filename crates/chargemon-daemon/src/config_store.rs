//! File-backed config persistence.
//!
//! The config lives as TOML in the per-user config directory
//! (`~/.config/chargemon/config.toml`). Loading never fails: a missing,
//! unreadable or malformed file yields defaults, and out-of-set values
//! are sanitized field-by-field.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use chargemon_core::{ConfigError, ConfigStore, MonitorConfig};

/// TOML-on-disk implementation of [`ConfigStore`].
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Creates a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chargemon")
            .join("config.toml")
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> MonitorConfig {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored config, using defaults");
                return MonitorConfig::default();
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read config, using defaults"
                );
                return MonitorConfig::default();
            }
        };

        match toml::from_str::<MonitorConfig>(&content) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Malformed config, using defaults"
                );
                MonitorConfig::default()
            }
        }
    }

    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Persist(e.to_string()))?;
        }

        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::Persist(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| ConfigError::Persist(e.to_string()))?;

        debug!(path = %self.path.display(), "Config persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("config.toml"));

        let mut config = MonitorConfig::default();
        config.set_plug_percent(55).unwrap();
        config.set_unplug_percent(95).unwrap();
        config.toggle_notification();

        store.save(&config).unwrap();
        assert_eq!(store.load(), config);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("absent.toml"));

        assert_eq!(store.load(), MonitorConfig::default());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "{ this is not toml").unwrap();

        let store = FileConfigStore::new(&path);
        assert_eq!(store.load(), MonitorConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "unplug_percent = 90\n").unwrap();

        let store = FileConfigStore::new(&path);
        let config = store.load();
        assert_eq!(config.unplug_percent, 90);
        assert_eq!(config.plug_percent, 40);
        assert!(config.alert_enabled);
    }

    #[test]
    fn out_of_set_values_are_sanitized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "plug_percent = 37\nunplug_percent = 90\n").unwrap();

        let store = FileConfigStore::new(&path);
        let config = store.load();
        assert_eq!(config.plug_percent, 40);
        assert_eq!(config.unplug_percent, 90);
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("nested").join("config.toml"));

        store.save(&MonitorConfig::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn default_path_is_per_app() {
        let path = FileConfigStore::default_path();
        assert!(path.to_string_lossy().contains("chargemon"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
