//! API route configuration.

use crate::api::handlers::{
    bulk_shorten_handler, dashboard_handler, health_handler, redirect_handler, shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link creation routes.
///
/// # Endpoints
///
/// - `POST /shorten`      - Shorten one URL
/// - `POST /shorten/bulk` - Shorten many URLs
///
/// Trailing slashes (`/shorten/`, `/shorten/bulk/`) are trimmed by the
/// top-level router before matching.
pub fn shorten_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/bulk", post(bulk_shorten_handler))
}

/// Public read routes.
///
/// # Endpoints
///
/// - `GET /health`        - Storage and click queue status
/// - `GET /{short_code}`  - Redirect to the original URL
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{short_code}", get(redirect_handler))
}

/// Admin dashboard routes; callers add the Basic auth layer.
///
/// # Endpoints
///
/// - `GET /shorturl/private` - Links with click counts
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/shorturl/private", get(dashboard_handler))
}
