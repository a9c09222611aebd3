use std::fs::{self, File};

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::WriteLogger;

use crate::app_dirs;

/// Log into a file under the data directory. The terminal owns stdout, so
/// nothing may log there once the UI is up.
pub fn init(verbose: bool) -> Result<()> {
    let dir = app_dirs::data_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))?;
    let path = dir.join("flowdeck.log");
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, simplelog::Config::default(), file)
        .context("logger initialized twice")?;
    log::info!("flowdeck starting, logging to {}", path.display());
    Ok(())
}
