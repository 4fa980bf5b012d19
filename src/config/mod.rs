//! Configuration management for PokeBase.
//!
//! This module handles loading and saving the user's configuration:
//! connection settings in `config.toml` and UI preferences in
//! `preferences.toml`, both under the platform config directory.

mod preferences;
mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use preferences::{PreferenceStore, Preferences};
pub use settings::Settings;

/// Name of the application directory inside the platform config dir.
const APP_DIR: &str = "pokebase";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// The config directory could not be created.
    #[error("Failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// A config file could not be read.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    /// A config file could not be written.
    #[error("Failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    /// A config file is not valid TOML for its schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value failed validation.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The PokeBase configuration directory (`<config_dir>/pokebase`).
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoConfigDir)
}
