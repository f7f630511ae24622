//! OCR capability.
//!
//! Recognition is abstracted behind the [`OcrEngine`] trait so the request
//! handler receives an explicit dependency instead of a process-global
//! client, and tests can substitute a stub engine.
//!
//! The production engine is Google Cloud Vision via its REST API
//! (`images:annotate` with `TEXT_DETECTION`).

mod vision;

pub use vision::GoogleVision;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during text recognition.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("{0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// A text-recognition backend.
///
/// Input is raw image bytes; output is the full recognized text, possibly
/// spanning multiple lines, or empty when the image contains no text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an image.
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;

    /// Engine name for logging.
    fn name(&self) -> &str;
}
