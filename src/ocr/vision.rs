//! Google Cloud Vision OCR engine.
//!
//! Talks to the Vision REST API (`images:annotate`) with a `TEXT_DETECTION`
//! feature request. Authentication uses the API key carried by the
//! credentials parsed at startup.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{OcrEngine, OcrError};
use crate::config::VisionCredentials;

const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com";

/// Google Cloud Vision OCR engine.
pub struct GoogleVision {
    credentials: VisionCredentials,
    client: Client,
}

/// `images:annotate` request format.
#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: String,
}

/// `images:annotate` response format.
#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<ImageError>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ImageError {
    message: String,
}

impl GoogleVision {
    /// Create a new Vision engine with the given credentials.
    pub fn new(credentials: VisionCredentials) -> Self {
        // No request timeout: a hung Vision call hangs the request, callers
        // impose their own deadline.
        Self {
            credentials,
            client: Client::new(),
        }
    }

    fn annotate_url(&self) -> String {
        let base = self
            .credentials
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT);
        format!(
            "{}/v1/images:annotate?key={}",
            base.trim_end_matches('/'),
            self.credentials.api_key
        )
    }

    /// Map one per-image response to recognized text.
    ///
    /// A populated error message wins over any partial annotations. The
    /// first annotation carries the full text; no annotations means the
    /// image contained no recognizable text.
    fn text_from_response(response: ImageResponse) -> Result<String, OcrError> {
        if let Some(error) = response.error {
            return Err(OcrError::Api(error.message));
        }
        Ok(response
            .text_annotations
            .into_iter()
            .next()
            .map(|a| a.description)
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl OcrEngine for GoogleVision {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let request = AnnotateRequest {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: BASE64.encode(image),
                },
                features: vec![Feature {
                    feature_type: "TEXT_DETECTION".to_string(),
                }],
            }],
        };

        debug!("Sending {} byte image to Vision API", image.len());
        let resp = self
            .client
            .post(self.annotate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OcrError::Api(format!("HTTP {}: {}", status, body)));
        }

        let annotate: AnnotateResponse = resp
            .json()
            .await
            .map_err(|e| OcrError::Parse(e.to_string()))?;

        let image_response = annotate.responses.into_iter().next().unwrap_or_default();
        Self::text_from_response(image_response)
    }

    fn name(&self) -> &str {
        "google-vision"
    }
}
