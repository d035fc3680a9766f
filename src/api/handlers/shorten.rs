//! Handlers for the link shortening endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{
    BulkShortenItem, BulkShortenRequest, ShortenRequest, ShortenResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a single long URL.
///
/// # Endpoint
///
/// `POST /shorten/`
///
/// # Request Body
///
/// ```json
/// { "original_url": "https://example.com/page", "length": 6 }
/// ```
///
/// `length` is optional (4-10) and defaults to `SHORT_CODE_LENGTH`.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "short_url": "http://localhost:8000/aZ3kQ9" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is not a valid request, the URL lacks
/// an `http://` or `https://` prefix, or `length` is out of range.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let length = payload.length.unwrap_or(state.default_code_length);
    let shortened = state
        .shorten_service
        .shorten(payload.original_url, length)
        .await?;

    tracing::info!(code = %shortened.short_code, "Short URL created");

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_url: shortened.short_url,
        }),
    ))
}

/// Creates short URLs for many long URLs in one request.
///
/// # Endpoint
///
/// `POST /shorten/bulk/`
///
/// # Request Body
///
/// ```json
/// { "urls": ["https://a.com", "not-a-url", "http://b.com"], "length": 6 }
/// ```
///
/// # Response
///
/// Entries without an `http(s)://` prefix are skipped; the rest keep their
/// input order.
///
/// ```json
/// [
///   { "original_url": "https://a.com", "short_url": "http://localhost:8000/Qw3rTy" },
///   { "original_url": "http://b.com", "short_url": "http://localhost:8000/aS9dF2" }
/// ]
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is not a valid request or `length` is
/// out of range.
pub async fn bulk_shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkShortenRequest>, JsonRejection>,
) -> Result<Json<Vec<BulkShortenItem>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let length = payload.length.unwrap_or(state.default_code_length);
    let submitted = payload.urls.len();

    let shortened = state
        .shorten_service
        .shorten_bulk(payload.urls, length)
        .await?;

    tracing::info!(
        submitted,
        created = shortened.len(),
        "Bulk short URLs created"
    );

    Ok(Json(shortened.into_iter().map(Into::into).collect()))
}
