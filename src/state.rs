//! Persisted panel state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::Path};

/// Everything that survives between invocations: seen flags and the panel's open flag.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    #[serde(default)]
    pub seen: BTreeMap<String, bool>,
    #[serde(default)]
    pub panel_open: bool,
}

impl PanelState {
    /// Loads state from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let state: PanelState = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(state)
    }

    /// Like [`PanelState::load_from_file`], but a file that doesn't exist yet is the default state.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        match Self::load_from_file(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Saves the state to a JSON file, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
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

    /// Read-modify-write of the state file.
    pub fn update<R>(path: &Path, f: impl FnOnce(&mut PanelState) -> R) -> Result<R, std::io::Error> {
        let mut state = Self::load_or_default(path)?;
        let result = f(&mut state);
        state.save(path)?;
        Ok(result)
    }
}
