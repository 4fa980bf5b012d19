//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, Settings};

/// Terminal client for a PokeBase Pokédex server.
#[derive(Parser, Debug)]
#[command(name = "pokebase")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Open this Pokémon at startup (name or dex number)
    #[arg(value_name = "POKEMON")]
    pub pokemon: Option<String>,

    /// Base URL of the PokeBase server (e.g., http://127.0.0.1:5000).
    /// The server must provide the JSON routes /api/pokemon-suggest and
    /// /api/pokemon/<name>
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Settings file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Save the effective settings to the settings file and exit
    #[arg(long)]
    pub write_config: bool,

    /// Log filter, e.g. `pokebase=debug` (RUST_LOG takes precedence)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Path of the settings file to use.
    pub fn settings_path(&self) -> config::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Settings::default_path(),
        }
    }

    /// The log filter to use unless `RUST_LOG` is set.
    pub fn log_filter<'a>(&'a self, settings: &'a Settings) -> Option<&'a str> {
        self.log_level
            .as_deref()
            .or(settings.log_level.as_deref())
    }

    /// Load settings from the settings file and apply overrides.
    pub fn resolve_settings(&self) -> config::Result<Settings> {
        let settings = Settings::load_from(&self.settings_path()?)?;
        match &self.url {
            Some(url) => settings.with_base_url(url.clone()),
            None => Ok(settings),
        }
    }
}
