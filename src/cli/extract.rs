//! One-shot extraction command.

use std::path::PathBuf;

use anyhow::Context;

use crate::config::VisionCredentials;
use crate::extract::extract_fields;
use crate::ocr::{GoogleVision, OcrEngine};

/// OCR an image (or load pre-recognized text) and print the extracted
/// fields as JSON.
pub async fn cmd_extract(image: Option<PathBuf>, text: Option<PathBuf>) -> anyhow::Result<()> {
    let recognized = match (image, text) {
        (_, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (Some(path), None) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if bytes.is_empty() {
                anyhow::bail!("Uploaded file is empty");
            }

            let credentials =
                VisionCredentials::from_env().context("Google Cloud Vision not initialized")?;
            let engine = GoogleVision::new(credentials);
            engine
                .recognize(&bytes)
                .await
                .context("Failed to process image")?
        }
        (None, None) => anyhow::bail!("Provide an image path or --text <file>"),
    };

    let fields = extract_fields(&recognized);
    let output = serde_json::json!({
        "status": "success",
        "extracted_text": recognized,
        "device_name": fields.device_name,
        "serial_number": fields.serial_number,
        "reading": fields.reading,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
