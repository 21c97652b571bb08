//! # Stage Timer
//!
//! Process entry point. Runs either as the host (HTTP/WebSocket server with
//! a fresh pairing code) or as a console remote paired with a running host.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use stage_timer::config::Settings;
use stage_timer::presentation::console;
use stage_timer::startup::Application;

#[derive(Parser)]
#[command(name = "stage-timer")]
#[command(about = "Presentation countdown timer with remote control", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the authoritative timer (default)
    Host,
    /// Control a running host from this terminal
    Remote {
        /// Pairing code shown by the host
        #[arg(env = "PAIRING_CODE")]
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for structured logging
    stage_timer::telemetry::init_tracing();

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(environment = %settings.environment, "Configuration loaded");

    match cli.command.unwrap_or(Commands::Host) {
        Commands::Host => run_host(settings).await,
        Commands::Remote { code } => {
            info!(host_url = %settings.remote.host_url, "Starting Stage Timer remote...");
            console::run_remote(&settings, &code).await
        }
    }
}

async fn run_host(settings: Settings) -> Result<()> {
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        "Starting Stage Timer host..."
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!(
        pairing_code = %application.host().pairing_code(),
        "Server ready to accept remotes"
    );
    application.run_until_stopped().await?;

    Ok(())
}
