use anyhow::Result;
use clap::Parser;
use folio::cli::{runner, Cli};
use folio::config::Config;
use folio::dispatcher::dispatch_command;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so `--json` output on stdout stays parseable.
/// `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    init_tracing(&config.log_level);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let command = runner::to_internal_command(cli.command.as_ref())?;
    dispatch_command(command, &config, cli.json).await
}
