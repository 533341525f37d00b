// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file and return the raw, unvalidated model.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the raw config the way the binary does.
///
/// - An explicit path must exist.
/// - Without one, `Scanqueue.toml` in the working directory is used if it
///   exists; otherwise built-in defaults apply.
pub fn load_or_default(explicit: Option<&Path>) -> Result<RawConfigFile> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let path = default_config_path();
    if path.is_file() {
        load_from_path(&path)
    } else {
        debug!(path = %path.display(), "no config file found; using defaults");
        Ok(RawConfigFile::default())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("Scanqueue.toml")
}
