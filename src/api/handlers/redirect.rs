//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Bytes escaped in the `Location` header.
///
/// Controls, DEL and non-ASCII cannot appear in a header value; the rest are
/// not allowed unescaped in a URL. `%` is kept so existing escapes survive.
const LOCATION: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{short_code}`
///
/// # Click Tracking
///
/// The click increment is handed to the background worker and never awaited.
/// Closing the connection early does not cancel it, and a full queue drops the
/// click rather than delaying the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.redirect_service.resolve(&short_code).await?;
    let location = location_header(&original_url)?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]))
}

/// Builds the `Location` value for a stored URL, escaping bytes a header
/// cannot carry.
pub fn location_header(url: &str) -> Result<HeaderValue, AppError> {
    let encoded = utf8_percent_encode(url, LOCATION).to_string();

    HeaderValue::try_from(encoded).map_err(|e| {
        tracing::error!(error = %e, "Stored URL is not a valid Location header");
        AppError::internal("Invalid redirect target", json!({}))
    })
}
