mod app;
mod app_dirs;
mod cli;
mod fetch;
mod kibana;
mod logging;
mod screens;
mod settings;

use std::sync::Arc;

use anyhow::Result;

use flowdeck_client::{MemoryClient, ResourceClient, RestClient};

fn main() -> Result<()> {
    let cli = cli::parse_cli();

    if cli.list_themes {
        for name in flowdeck_ui::theme_names() {
            println!("{name}");
        }
        return Ok(());
    }

    logging::init(cli.verbose)?;
    let settings = settings::load(&cli)?;

    if cli.print_config {
        settings.print_summary();
        return Ok(());
    }

    let client: Arc<dyn ResourceClient> = if settings.demo {
        log::info!("running against the in-memory demo control plane");
        Arc::new(MemoryClient::sample())
    } else {
        let server = settings
            .server
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no control plane server configured"))?;
        Arc::new(RestClient::new(server)?)
    };

    app::run(settings, client)
}
