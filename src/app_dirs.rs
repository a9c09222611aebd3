//! Resolve configuration and data directories for `flowdeck`.
//!
//! Environment overrides take precedence over the platform-appropriate
//! locations provided by the `directories` crate.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "flowdeck";
const APPLICATION: &str = "flowdeck";

const CONFIG_DIR_ENV: &str = "FLOWDECK_CONFIG_DIR";
const DATA_DIR_ENV: &str = "FLOWDECK_DATA_DIR";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| anyhow!("unable to determine project directories for flowdeck"))
}

fn dir_from_env(name: &str) -> Option<PathBuf> {
    let value = env::var_os(name)?;
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// Directory holding `flowdeck.toml`.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = dir_from_env(CONFIG_DIR_ENV) {
        return Ok(dir);
    }
    Ok(project_dirs()?.config_local_dir().to_path_buf())
}

/// Directory holding the log file and other runtime artifacts.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = dir_from_env(DATA_DIR_ENV) {
        return Ok(dir);
    }
    Ok(project_dirs()?.data_local_dir().to_path_buf())
}
