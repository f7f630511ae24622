//! Configuration: Vision credentials and server bind address.
//!
//! Credentials come from the `GOOGLE_APPLICATION_CREDENTIALS_JSON`
//! environment variable, a JSON-encoded object parsed once at startup.
//! If the variable is missing or invalid, the OCR capability stays
//! disabled for the lifetime of the process; there is no hot reload.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Environment variable carrying the Vision credentials.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS_JSON";

/// Default serve port (matches the original deployment).
pub const DEFAULT_PORT: u16 = 5001;

/// Credentials for the Vision REST API.
///
/// The `endpoint` override points the engine at a proxy or test server
/// instead of `vision.googleapis.com`.
#[derive(Debug, Clone, Deserialize)]
pub struct VisionCredentials {
    pub api_key: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Errors that can occur loading credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable GOOGLE_APPLICATION_CREDENTIALS_JSON not set")]
    MissingCredentials,

    #[error("Invalid credentials JSON: {0}")]
    InvalidCredentials(String),
}

impl VisionCredentials {
    /// Parse credentials from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let credentials: VisionCredentials = serde_json::from_str(json)
            .map_err(|e| ConfigError::InvalidCredentials(e.to_string()))?;
        if credentials.api_key.is_empty() {
            return Err(ConfigError::InvalidCredentials(
                "api_key is empty".to_string(),
            ));
        }
        Ok(credentials)
    }

    /// Load credentials from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let json = std::env::var(CREDENTIALS_ENV).map_err(|_| ConfigError::MissingCredentials)?;
        Self::from_json(&json)
    }

    /// Load credentials from the environment, logging the degraded mode
    /// once instead of failing. `None` disables OCR for the process.
    pub fn from_env_or_warn() -> Option<Self> {
        match Self::from_env() {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                warn!("Vision client not initialized: {}", e);
                None
            }
        }
    }
}

/// Parse a bind address that can be:
/// - Just a port: "8080" -> 0.0.0.0:8080
/// - Just a host: "127.0.0.1" -> 127.0.0.1:5001
/// - Host and port: "127.0.0.1:8080" -> 127.0.0.1:8080
pub fn parse_bind_address(bind: &str) -> (String, u16) {
    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return ("0.0.0.0".to_string(), port);
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return (host.to_string(), port);
        }
    }

    // Must be just a host, use default port
    (bind.to_string(), DEFAULT_PORT)
}
