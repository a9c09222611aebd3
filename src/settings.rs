use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use config::{Config, File};
use flowdeck_ui::{Theme, theme_names};
use serde::Deserialize;

use crate::app_dirs;
use crate::cli::CliArgs;

const CONFIG_FILE: &str = "flowdeck.toml";
const DEFAULT_PAGE_SIZE: usize = 15;
const DEFAULT_KIBANA: &str = "http://localhost:5601";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    server: ServerSection,
    ui: UiSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    control_plane: Option<String>,
    kibana: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UiSection {
    page_size: Option<usize>,
    theme: Option<String>,
}

/// Configuration after merging the config file under CLI flags.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub server: Option<String>,
    pub kibana: String,
    pub page_size: usize,
    pub theme_name: String,
    pub theme: Theme,
    pub demo: bool,
}

impl ResolvedConfig {
    pub fn print_summary(&self) {
        println!("Effective configuration:");
        println!(
            "  Control plane: {}",
            self.server.as_deref().unwrap_or("(demo)")
        );
        println!("  Kibana: {}", self.kibana);
        println!("  Page size: {}", self.page_size);
        println!("  Theme: {}", self.theme_name);
    }
}

pub fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
    let path = config_path(cli)?;
    let raw = read_raw(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    resolve(cli, raw)
}

fn config_path(cli: &CliArgs) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => Ok(app_dirs::config_dir()?.join(CONFIG_FILE)),
    }
}

fn read_raw(path: &PathBuf) -> Result<RawConfig> {
    let settings = Config::builder()
        .add_source(File::from(path.clone()).required(false))
        .build()?;
    Ok(settings.try_deserialize()?)
}

fn resolve(cli: &CliArgs, raw: RawConfig) -> Result<ResolvedConfig> {
    let server = cli.server.clone().or(raw.server.control_plane);
    if server.is_none() && !cli.demo {
        bail!("no control-plane server configured; pass --server, set FLOWDECK_SERVER, or use --demo");
    }

    let page_size = cli
        .page_size
        .or(raw.ui.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    ensure!(page_size > 0, "page size must be greater than zero");

    let theme_name = cli
        .theme
        .clone()
        .or(raw.ui.theme)
        .unwrap_or_else(|| "default".to_string());
    let Some(theme) = Theme::by_name(&theme_name) else {
        bail!(
            "unknown theme '{theme_name}' (available: {})",
            theme_names().join(", ")
        );
    };

    Ok(ResolvedConfig {
        server,
        kibana: cli
            .kibana_server
            .clone()
            .or(raw.server.kibana)
            .unwrap_or_else(|| DEFAULT_KIBANA.to_string()),
        page_size,
        theme_name,
        theme,
        demo: cli.demo,
    })
}
