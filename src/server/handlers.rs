//! HTTP request handlers.

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::{assets, templates, AppState};
use crate::extract::{extract_fields, ExtractedFields};

/// Failure modes of the upload pipeline.
///
/// Every failure is converted to a JSON error body at this boundary; the
/// caller always receives a complete JSON object, never a crash.
#[derive(Debug, Error)]
pub enum UploadError {
    /// OCR credentials were missing or invalid at startup.
    #[error("Google Cloud Vision not initialized")]
    ServiceUnavailable,

    /// The caller supplied no file or an empty filename.
    #[error("{0}")]
    BadRequest(String),

    /// Empty upload, OCR service error, or any unexpected pipeline failure.
    #[error("Failed to process image: {0}")]
    Processing(String),
}

impl UploadError {
    fn status(&self) -> StatusCode {
        match self {
            UploadError::ServiceUnavailable | UploadError::Processing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            UploadError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Successful upload response: raw recognized text plus extracted fields.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    status: &'static str,
    extracted_text: String,
    #[serde(flatten)]
    fields: ExtractedFields,
}

/// Upload page.
pub async fn index() -> Html<&'static str> {
    Html(templates::UPLOAD_PAGE)
}

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Serve CSS.
pub async fn serve_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}

/// Accept a multipart image upload, OCR it, and extract fields.
pub async fn upload_and_ocr(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    match process_upload(&state, multipart).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            // Bad requests carry their own response; only pipeline
            // failures are worth operator attention.
            if !matches!(e, UploadError::BadRequest(_)) {
                warn!("Error during OCR: {}", e);
            }
            Err(e)
        }
    }
}

async fn process_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<UploadResponse, UploadError> {
    let Some(engine) = &state.ocr else {
        return Err(UploadError::ServiceUnavailable);
    };

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Processing(e.to_string()))?
    {
        if field.name() == Some("image") {
            // A part without a filename parameter is a plain form value,
            // not a file upload; keep looking.
            let Some(filename) = field.file_name().map(str::to_string) else {
                continue;
            };
            let data = field
                .bytes()
                .await
                .map_err(|e| UploadError::Processing(e.to_string()))?;
            upload = Some((filename, data));
            break;
        }
    }

    let Some((filename, data)) = upload else {
        return Err(UploadError::BadRequest("No image file provided".to_string()));
    };
    if filename.is_empty() {
        return Err(UploadError::BadRequest("No selected file".to_string()));
    }
    if data.is_empty() {
        return Err(UploadError::Processing("Uploaded file is empty".to_string()));
    }

    let extracted_text = engine
        .recognize(&data)
        .await
        .map_err(|e| UploadError::Processing(e.to_string()))?;

    let fields = extract_fields(&extracted_text);
    info!(
        engine = engine.name(),
        device_name = %fields.device_name,
        serial_number = %fields.serial_number,
        reading = %fields.reading,
        "Extracted fields"
    );

    Ok(UploadResponse {
        status: "success",
        extracted_text,
        fields,
    })
}
