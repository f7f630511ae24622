//! Web server for nameplate OCR uploads.
//!
//! Serves the upload page and the `/upload_and_ocr` endpoint: one multipart
//! image in, recognized text plus extracted fields out. The OCR engine is
//! an explicit dependency on [`AppState`], never process-global, so tests
//! run against the real router with a stub engine.

mod assets;
mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::VisionCredentials;
use crate::ocr::{GoogleVision, OcrEngine};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    /// OCR engine, or `None` when credentials were unavailable at startup.
    /// Stays `None` for the process lifetime; initialization is not retried.
    pub ocr: Option<Arc<dyn OcrEngine>>,
}

impl AppState {
    pub fn new(credentials: Option<VisionCredentials>) -> Self {
        Self {
            ocr: credentials.map(|c| Arc::new(GoogleVision::new(c)) as Arc<dyn OcrEngine>),
        }
    }
}

/// Start the web server.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::ocr::OcrError;

    /// Stub OCR engine returning a fixed outcome.
    struct StubEngine {
        outcome: Result<String, String>,
    }

    impl StubEngine {
        fn text(text: &str) -> Self {
            Self {
                outcome: Ok(text.to_string()),
            }
        }

        fn error(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
            }
        }
    }

    #[async_trait::async_trait]
    impl OcrEngine for StubEngine {
        async fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
            self.outcome.clone().map_err(OcrError::Api)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn app_with_engine(engine: StubEngine) -> axum::Router {
        create_router(AppState {
            ocr: Some(Arc::new(engine)),
        })
    }

    fn app_without_engine() -> axum::Router {
        create_router(AppState { ocr: None })
    }

    const BOUNDARY: &str = "nameplate-test-boundary";

    /// Build a multipart upload request with a single file field.
    fn upload_request(field_name: &str, filename: Option<&str>, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match filename {
            Some(name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field_name, name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field_name),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload_and_ocr")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Multipart request with no fields at all.
    fn empty_upload_request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload_and_ocr")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(format!("--{}--\r\n", BOUNDARY)))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_without_engine();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_page() {
        let app = app_without_engine();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("upload_and_ocr"));
    }

    #[tokio::test]
    async fn test_static_css() {
        let app = app_without_engine();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/style.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .map(|v| v.to_str().unwrap_or(""));
        assert!(content_type.unwrap_or("").contains("css"));
    }

    #[tokio::test]
    async fn test_upload_engine_not_initialized() {
        let app = app_without_engine();

        // Even a perfectly valid upload is rejected
        let response = app
            .oneshot(upload_request("image", Some("plate.jpg"), b"fakeimage"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Google Cloud Vision not initialized");
    }

    #[tokio::test]
    async fn test_upload_no_image_field() {
        let app = app_with_engine(StubEngine::text("irrelevant"));

        let response = app.oneshot(empty_upload_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No image file provided");
    }

    #[tokio::test]
    async fn test_upload_wrong_field_name() {
        let app = app_with_engine(StubEngine::text("irrelevant"));

        let response = app
            .oneshot(upload_request("photo", Some("plate.jpg"), b"fakeimage"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No image file provided");
    }

    #[tokio::test]
    async fn test_upload_plain_field_is_not_a_file() {
        let app = app_with_engine(StubEngine::text("irrelevant"));

        // A non-file form value named "image" (no filename parameter)
        let response = app
            .oneshot(upload_request("image", None, b"some text value"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No image file provided");
    }

    #[tokio::test]
    async fn test_upload_empty_filename() {
        let app = app_with_engine(StubEngine::text("irrelevant"));

        let response = app
            .oneshot(upload_request("image", Some(""), b"fakeimage"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No selected file");
    }

    #[tokio::test]
    async fn test_upload_empty_file() {
        let app = app_with_engine(StubEngine::text("irrelevant"));

        let response = app
            .oneshot(upload_request("image", Some("plate.jpg"), b""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Failed to process image: Uploaded file is empty");
    }

    #[tokio::test]
    async fn test_upload_ocr_error_propagates() {
        let app = app_with_engine(StubEngine::error("quota exceeded"));

        let response = app
            .oneshot(upload_request("image", Some("plate.jpg"), b"fakeimage"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Failed to process image: quota exceeded");
    }

    #[tokio::test]
    async fn test_upload_success_end_to_end() {
        let app = app_with_engine(StubEngine::text("ANALYZER AB1234\nReading: 12.5 %"));

        let response = app
            .oneshot(upload_request("image", Some("plate.jpg"), b"fakeimage"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(
            json,
            serde_json::json!({
                "status": "success",
                "extracted_text": "ANALYZER AB1234\nReading: 12.5 %",
                "device_name": "ANALYZER AB1234",
                "serial_number": "AB1234",
                "reading": "12.5 %",
            })
        );
    }

    #[tokio::test]
    async fn test_upload_accepts_multi_megabyte_image() {
        let app = app_with_engine(StubEngine::text("METTLER TOLEDO XS204\n5.000 g"));

        // Phone camera photos are well past axum's 2 MB default body limit
        let image = vec![0xAB; 4 * 1024 * 1024];
        let response = app
            .oneshot(upload_request("image", Some("photo.jpg"), &image))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["device_name"], "METTLER TOLEDO XS204");
        assert_eq!(json["reading"], "5.000 g");
    }

    #[tokio::test]
    async fn test_upload_success_no_text_detected() {
        let app = app_with_engine(StubEngine::text(""));

        let response = app
            .oneshot(upload_request("image", Some("blank.jpg"), b"fakeimage"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["extracted_text"], "");
        assert_eq!(json["device_name"], "");
        assert_eq!(json["serial_number"], "");
        assert_eq!(json["reading"], "");
    }
}
