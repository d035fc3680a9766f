//! URL record entity representing a short code mapping.

use serde::Serialize;

/// A persisted mapping from a short code to its original URL.
///
/// `id`, `short_code` and `original_url` never change after creation.
/// `clicks` only grows, and only through the click tracking path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UrlRecord {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(id: i64, short_code: String, original_url: String, clicks: i64) -> Self {
        Self {
            id,
            short_code,
            original_url,
            clicks,
        }
    }
}

/// Input data for creating a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub short_code: String,
    pub original_url: String,
}

impl NewUrlRecord {
    pub fn new(short_code: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            original_url: original_url.into(),
        }
    }
}
