//! HTTP Basic authentication for the admin dashboard.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBasic;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Authenticates dashboard requests against `ADMIN_USERNAME` / `ADMIN_PASSWORD`.
///
/// # Header Format
///
/// ```text
/// Authorization: Basic <base64(username:password)>
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Basic` if the header is
/// missing, malformed, or the credentials do not match.
///
/// # Example
///
/// ```rust,ignore
/// let admin = Router::new()
///     .route("/shorturl/private", get(dashboard_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBasic((username, password)) = AuthBasic::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    if !st
        .admin
        .verify(&username, password.as_deref().unwrap_or_default())
    {
        tracing::warn!("Rejected admin login attempt");
        return Err(AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "Invalid credentials" }),
        ));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}
