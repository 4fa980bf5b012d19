//! File logging for the TUI.
//!
//! Records go to a daily file under the local data directory so they never
//! reach the terminal. The filter is taken from the first of: `RUST_LOG`,
//! the `--log-level` flag, `log_level` in `config.toml`, and the built-in
//! default.
//!
//! `pokebase=debug` records every suggestion request and each stale
//! response that gets dropped; `trace` adds per-key detail.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Filter used when nothing else is configured.
const DEFAULT_FILTER: &str = "pokebase=info,warn";

/// Prefix of the daily log files.
const LOG_FILE_PREFIX: &str = "pokebase.log";

/// Where the active filter directive came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    /// The `RUST_LOG` environment variable.
    Environment,
    /// The command line or the settings file.
    Configured,
    /// Nothing was set.
    Default,
}

/// Pick the filter directive. Blank values count as unset.
fn select_filter(env: Option<&str>, configured: Option<&str>) -> (String, FilterSource) {
    fn non_blank(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    if let Some(directive) = non_blank(env) {
        (directive.to_string(), FilterSource::Environment)
    } else if let Some(directive) = non_blank(configured) {
        (directive.to_string(), FilterSource::Configured)
    } else {
        (DEFAULT_FILTER.to_string(), FilterSource::Default)
    }
}

/// Install the global file subscriber and return the log directory.
///
/// `configured` is the directive from the command line or settings file. A
/// directive that does not parse is replaced by the default and reported in
/// the log once the subscriber is up.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created, or
/// if a global subscriber is already set.
pub fn init(configured: Option<&str>) -> anyhow::Result<PathBuf> {
    let log_dir = log_directory().context("Could not determine local data directory")?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Could not create {}", log_dir.display()))?;

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (directive, source) = select_filter(env.as_deref(), configured);
    let (filter, rejected) = match EnvFilter::try_new(&directive) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_FILTER), Some(e)),
    };

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .context("A global logger is already installed")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        filter = %directive,
        ?source,
        "PokeBase starting up"
    );
    if let Some(e) = rejected {
        warn!(error = %e, directive = %directive, "Invalid log filter, using {}", DEFAULT_FILTER);
    }

    Ok(log_dir)
}

/// Where log files are written.
pub fn log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("pokebase").join("logs"))
}
