//! DTOs for the shorten endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ShortenedUrl;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten. Must start with `http://` or `https://`.
    #[validate(length(min = 1, max = 2083))]
    pub original_url: String,

    /// Code length; the configured default applies when omitted.
    #[validate(range(min = 4, max = 10))]
    pub length: Option<usize>,
}

/// Response for a single shortened URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_url: String,
}

/// Request to shorten many URLs at once.
///
/// Entries without an `http://` or `https://` prefix are skipped.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkShortenRequest {
    pub urls: Vec<String>,

    #[validate(range(min = 4, max = 10))]
    pub length: Option<usize>,
}

/// One created link in a bulk response.
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkShortenItem {
    pub original_url: String,
    pub short_url: String,
}

impl From<ShortenedUrl> for BulkShortenItem {
    fn from(shortened: ShortenedUrl) -> Self {
        Self {
            original_url: shortened.original_url,
            short_url: shortened.short_url,
        }
    }
}
