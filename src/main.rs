//! Main entry point for the catalog-downloader CLI

use catalog_downloader::cancel::CancelToken;
use catalog_downloader::cli::{Cli, Commands};
use catalog_downloader::downloader::JobStatus;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_downloader=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Ctrl+C requests cooperative cancellation; the job stops at the next
    // item boundary.
    let cancel = CancelToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Ctrl+C received - stopping after the current item...");
                cancel.cancel();
            }
        }
    });

    let result = match cli.command {
        Commands::Download(ref args) => args.execute(cancel).await,
    };

    match result {
        Ok(outcome) => {
            let code = match outcome.status {
                JobStatus::Completed | JobStatus::CompletedWithWarnings => 0,
                JobStatus::Cancelled => 130,
                _ => 1,
            };
            std::process::exit(code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            std::process::exit(1);
        }
    }
}
