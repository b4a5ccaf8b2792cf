//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod number;
pub mod parse;

use std::path::{Path, PathBuf};

use tracing::debug;

use qat_core::ParserConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("qat")
        .join("config.json")
}

/// Configuration file in effect: the `--config` override, else the default.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the parser configuration.
///
/// An explicit path must exist; the default path falls back to built-in
/// settings when no file has been created yet.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<ParserConfig> {
    if let Some(path) = explicit {
        debug!("Loading configuration from {}", path);
        return Ok(ParserConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(ParserConfig::from_file(&path)?)
    } else {
        debug!("No configuration file, using defaults");
        Ok(ParserConfig::default())
    }
}
