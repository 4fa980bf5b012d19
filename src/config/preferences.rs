//! Persisted UI preferences.
//!
//! Holds a single key, `theme`, read once at startup and rewritten whenever
//! the user toggles the theme.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{config_dir, ConfigError, Result};
use crate::ui::theme::ThemeName;

/// File name of the preferences file.
const PREFERENCES_FILE: &str = "preferences.toml";

/// UI preferences.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    /// The selected theme.
    #[serde(default)]
    pub theme: ThemeName,
}

/// File-backed preference storage.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(config_dir()?.join(PREFERENCES_FILE)))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored preferences.
    ///
    /// Missing or unreadable files give the defaults.
    pub fn load(&self) -> Preferences {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.path.display(), "No stored preferences: {}", e);
                return Preferences::default();
            }
        };

        toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "Ignoring invalid preferences: {}", e);
            Preferences::default()
        })
    }

    /// Persist the preferences.
    pub fn save(&self, preferences: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let content = toml::to_string(preferences)?;
        fs::write(&self.path, content).map_err(ConfigError::WriteError)?;
        debug!(theme = %preferences.theme, "Saved preferences");
        Ok(())
    }
}
