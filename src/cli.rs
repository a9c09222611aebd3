use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments. Everything here can also come from the config
/// file; flags win over file values.
#[derive(Parser, Debug, Default)]
#[command(name = "flowdeck", version, about = "Terminal dashboard for a dataflow control plane")]
pub struct CliArgs {
    /// Base URL of the control-plane REST API.
    #[arg(long, env = "FLOWDECK_SERVER")]
    pub server: Option<String>,

    /// Base URL of the Kibana instance serving analytics visualizations.
    #[arg(long, env = "FLOWDECK_KIBANA")]
    pub kibana_server: Option<String>,

    /// Rows per table page.
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Color theme (see --list-themes).
    #[arg(long)]
    pub theme: Option<String>,

    /// Explicit config file path instead of the platform default.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    pub print_config: bool,

    /// List available themes and exit.
    #[arg(long)]
    pub list_themes: bool,

    /// Run against a built-in in-memory control plane with sample
    /// dataflows; no server required.
    #[arg(long)]
    pub demo: bool,

    /// Log at debug level.
    #[arg(long, short)]
    pub verbose: bool,
}

pub fn parse_cli() -> CliArgs {
    CliArgs::parse()
}
