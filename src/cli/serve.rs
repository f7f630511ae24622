//! Web server command.

use crate::config::{parse_bind_address, VisionCredentials};
use crate::server::AppState;

/// Start the web server.
pub async fn cmd_serve(bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind);

    // Credentials are loaded exactly once; a missing or invalid key leaves
    // the OCR capability disabled until restart.
    let credentials = VisionCredentials::from_env_or_warn();
    if credentials.is_none() {
        eprintln!("Warning: OCR disabled, uploads will fail until credentials are configured");
    }

    println!("Starting nameplate server at http://{}:{}", host, port);
    println!("  Press Ctrl+C to stop");

    let state = AppState::new(credentials);
    crate::server::serve(state, &host, port).await
}
