pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Single-page tool
        .route(
            "/",
            get(handlers::handle_index).post(handlers::handle_upload_page),
        )
        // JSON API
        .route("/api/v1/screen", post(handlers::handle_screen))
        .route("/api/v1/categories", get(handlers::handle_categories))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
