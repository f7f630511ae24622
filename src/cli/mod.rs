//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific
//! modules.

mod extract;
mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nameplate")]
#[command(about = "Instrument nameplate OCR and field extraction service")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Bind address: port, host, or host:port
        #[arg(short, long, default_value = "0.0.0.0:5001", env = "NAMEPLATE_BIND")]
        bind: String,
    },

    /// OCR an image (or read a text file) and print the extracted fields
    Extract {
        /// Image to OCR
        image: Option<PathBuf>,

        /// Skip OCR and extract fields from an already-recognized text file
        #[arg(long, conflicts_with = "image")]
        text: Option<PathBuf>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => serve::cmd_serve(&bind).await,
        Commands::Extract { image, text } => extract::cmd_extract(image, text).await,
    }
}
