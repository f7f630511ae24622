//! Nameplate - instrument nameplate OCR and field extraction service.
//!
//! Accepts photographed instrument displays and nameplates, runs them
//! through Google Cloud Vision OCR, and extracts structured fields
//! (device name, serial number, reading) from the recognized text.

mod cli;
mod config;
mod extract;
mod ocr;
mod server;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "nameplate=info"
    } else {
        "nameplate=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
