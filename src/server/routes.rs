//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Upload size limit. Phone camera photos routinely exceed axum's 2 MB
/// default, so allow anything a reasonable camera produces.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/upload_and_ocr", post(handlers::upload_and_ocr))
        .route("/health", get(handlers::health))
        .route("/static/style.css", get(handlers::serve_css))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
