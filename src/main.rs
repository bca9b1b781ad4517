//! Mentora - AI study tutor CLI
//!
//! Main entry point: initializes tracing, loads configuration, and
//! dispatches to the command handlers.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mentora::cli::{Cli, Commands};
use mentora::commands;
use mentora::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref().unwrap_or("mentora.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Chat { action } => {
            tracing::info!("Starting interactive chat");
            commands::chat::run_chat(config, action).await
        }
        Commands::Notes { command } => commands::notes::run(&config, command),
        Commands::Stats { days, json } => commands::stats::run(&config, days, json),
        Commands::Key { command } => commands::key::run(&config, command),
        Commands::Sessions => commands::sessions::run(&config),
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "mentora=debug" } else { "mentora=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
