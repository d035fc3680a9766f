//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten/`        - Create a short URL (rate limited)
//! - `POST /shorten/bulk/`   - Create short URLs in bulk (rate limited)
//! - `GET  /health`          - Health check: storage and click queue
//! - `GET  /shorturl/private` - Admin dashboard (Basic auth, strict rate limit)
//! - `GET  /{short_code}`    - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - HTTP Basic on the admin dashboard
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{admin_auth, rate_limit, tracing};
use crate::state::AppState;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// The server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()` because rate limiting
/// keys on the peer address.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let shorten_router = api::routes::shorten_routes().layer(rate_limit::layer());

    let admin_router = api::routes::admin_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::layer,
        ))
        .layer(rate_limit::secure_layer());

    let router = Router::new()
        .merge(shorten_router)
        .merge(admin_router)
        .merge(api::routes::public_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
