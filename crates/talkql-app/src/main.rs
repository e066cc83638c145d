//! TalkQL terminal client - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the HTTP query service and the session controller
//! 4. Resolve the connected data source
//! 5. Run the terminal loop until the user quits or disconnects

mod cli;
mod terminal;

use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use talkql_client::HttpQueryService;
use talkql_core::TalkqlConfig;
use talkql_session::{QuerySessionController, SessionError};

use crate::cli::CliArgs;
use crate::terminal::TerminalNavigator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let config = TalkqlConfig::load_or_default(&config_file);

    // Tracing goes to stderr so it never interleaves with the transcript.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let base_url = args.resolve_base_url(&config.service.base_url);
    let service = Arc::new(HttpQueryService::new(base_url));
    tracing::info!(url = %service.base_url(), "Query service configured");

    let navigator = Arc::new(TerminalNavigator::new());
    let modes = args.resolve_modes(&config.display);
    let mut controller =
        QuerySessionController::with_modes(Arc::clone(&service), Arc::clone(&navigator), modes);

    match controller.start(&args.session_params()).await {
        Ok(info) => tracing::info!(connection = %info, "Connected"),
        Err(SessionError::ConnectionUnavailable(reason)) => {
            eprintln!("No database connected ({reason}). Connect a data source and try again.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    terminal::run(&mut controller, &navigator, input, &mut out).await?;

    tracing::info!("TalkQL session ended");
    Ok(())
}
