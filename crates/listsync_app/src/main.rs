mod config;
mod host;
mod logging;

use std::path::PathBuf;

use clap::Parser;
use listsync_logging::sync_info;

use config::{load_config, Overrides};
use logging::LogDestination;

/// Browse a paginated backend collection from the terminal.
#[derive(Debug, Parser)]
#[command(name = "listsync", version)]
struct Cli {
    /// RON config file (defaults to ./listsync.ron when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Backend origin that relative endpoints resolve against
    #[arg(long)]
    backend_url: Option<String>,
    /// Collection endpoint, e.g. /api/samples/
    #[arg(long)]
    endpoint: Option<String>,
    /// Ordering key; prefix with '-' for descending
    #[arg(long, allow_hyphen_values = true)]
    ordering: Option<String>,
    /// Initial search term
    #[arg(long)]
    search: Option<String>,
    /// Process scope applied to the list
    #[arg(long)]
    process: Option<String>,
    /// Where log output goes
    #[arg(long, value_enum)]
    log: Option<LogDestination>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            backend_url: self.backend_url.clone(),
            endpoint: self.endpoint.clone(),
            ordering: self.ordering.clone(),
            search: self.search.clone(),
            process: self.process.clone(),
            log: self.log,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    config.apply(cli.overrides());
    logging::initialize(config.log, config.level()?, &config.log_file);
    sync_info!(
        "Starting listsync backend={} endpoint={}",
        config.backend_url,
        config.list.base_endpoint
    );

    host::run(config)
}
