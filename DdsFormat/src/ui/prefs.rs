//! Read-side preferences stored as JSON in the user's config directory

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::options::AlphaMode;

/// Remembered answer to the open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReadPreferences {
    /// Alpha mode applied when opening a texture.
    #[serde(default)]
    pub alpha: AlphaMode,
    /// Apply `alpha` without asking.
    #[serde(default)]
    pub auto: bool,
}

impl ReadPreferences {
    /// `<config dir>/DdsFormat/preferences.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("DdsFormat").join("preferences.json"))
    }

    /// Load from the default location, or return defaults.
    #[must_use]
    pub fn load() -> Self {
        Self::default_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load from `path`. Missing or unparsable files yield defaults.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!("ignoring preferences {}: {err}", path.display());
            Self::default()
        })
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        match Self::default_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let prefs = ReadPreferences {
            alpha: AlphaMode::Transparency,
            auto: true,
        };
        prefs.save_to(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"transparency\""));
        assert_eq!(ReadPreferences::load_from(&path), prefs);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let prefs = ReadPreferences::load_from(&dir.path().join("absent.json"));
        assert_eq!(prefs, ReadPreferences::default());
        assert_eq!(prefs.alpha, AlphaMode::Channel);
        assert!(!prefs.auto);
    }

    #[test]
    fn test_garbage_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ReadPreferences::load_from(&path), ReadPreferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{ "auto": true }"#).unwrap();
        let prefs = ReadPreferences::load_from(&path);
        assert!(prefs.auto);
        assert_eq!(prefs.alpha, AlphaMode::Channel);
    }
}
