//! Application configuration.

use crate::consts::panel_consts::{
    API_PATH, FALLBACK_PATHS, PANEL_ID, REQUEST_TIMEOUT_SECS, SEEN_KEY, TOAST_ID,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use std::{fs, path::Path};

/// Overrides the directory holding `config.json` and `state.json`.
pub const HOME_ENV: &str = "UPDATES_PANEL_HOME";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Page URL that relative source paths are resolved against.
    /// Without one, relative paths are read from disk.
    pub base_url: Option<String>,
    /// Primary API path. `None` skips straight to the fallbacks.
    pub api_path: Option<String>,
    /// Static feed locations, tried in order.
    pub fallback_paths: Vec<String>,
    /// Versioned key for the one-time toast.
    pub seen_key: String,
    pub request_timeout_secs: u64,
    pub panel_id: String,
    pub toast_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            api_path: Some(API_PATH.to_string()),
            fallback_paths: FALLBACK_PATHS.iter().map(|p| p.to_string()).collect(),
            seen_key: SEEN_KEY.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            panel_id: PANEL_ID.to_string(),
            toast_id: TOAST_ID.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails, JSON is invalid
    /// or `request_timeout_secs` is zero.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if config.request_timeout_secs == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "request_timeout_secs must be at least 1",
            ));
        }
        Ok(config)
    }

    /// Loads the file if it exists; otherwise the defaults.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    #[allow(unused)]
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Directory for config and state: `$UPDATES_PANEL_HOME`, else `~/.updates-panel`.
pub fn get_app_dir() -> Result<PathBuf, std::io::Error> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home.join(".updates-panel"))
}

pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    Ok(get_app_dir()?.join("config.json"))
}

pub fn get_state_path() -> Result<PathBuf, std::io::Error> {
    Ok(get_app_dir()?.join("state.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            base_url: Some("https://example.com/maple-calc/".to_string()),
            api_path: None,
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Keys missing from the file fall back to their defaults.
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"seen_key":"updates_seen_v7"}"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.seen_key, "updates_seen_v7");
        assert_eq!(config.api_path.as_deref(), Some("/api/updates"));
        assert_eq!(config.fallback_paths.len(), 4);
        assert_eq!(config.fallback_paths[0], "./data/updates.json");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    // A zero timeout would fail every request immediately, so it is rejected.
    fn test_zero_timeout_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"request_timeout_secs":0}"#).unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("request_timeout_secs"));
        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    // A missing file means the defaults.
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let result = Config::default().save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        assert!(Config::load_from_file(&path).is_err());
        assert!(Config::load_or_default(&path).is_err());
    }
}
