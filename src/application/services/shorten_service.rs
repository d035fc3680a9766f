//! Short code allocation and link creation service.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CODE_LENGTH_RANGE, generate_code, is_valid_length};
use crate::utils::url_validator::is_acceptable_url;

/// Default cap on allocation attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000;

/// A created short link as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
}

/// Service for allocating unique short codes and persisting new links.
///
/// A candidate code is checked against storage before the insert, and the insert
/// itself is guarded by the storage uniqueness constraint. A write that loses
/// the race to a concurrent request is retried with a fresh code.
pub struct ShortenService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    domain: String,
    max_attempts: usize,
}

impl<R: UrlRepository + ?Sized> ShortenService<R> {
    /// Creates a new shorten service.
    ///
    /// `domain` is the public prefix of every short URL, e.g. `https://s.example.com`.
    pub fn new(repository: Arc<R>, domain: impl Into<String>) -> Self {
        Self {
            repository,
            domain: domain.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the allocation attempt cap.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.domain.trim_end_matches('/'), code)
    }

    /// Returns a short code that was not present in storage when checked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `length` is outside 4..=10.
    /// Returns [`AppError::Internal`] if no free code was found within the
    /// attempt cap, or on storage errors.
    pub async fn allocate_code(&self, length: usize) -> Result<String, AppError> {
        ensure_valid_length(length)?;

        for _ in 0..self.max_attempts {
            let candidate = generate_code(length);

            if !self.repository.exists(&candidate).await? {
                return Ok(candidate);
            }

            metrics::counter!("shorturl_code_collisions_total").increment(1);
            debug!(code = %candidate, "Generated code already taken, retrying");
        }

        Err(AppError::code_space_exhausted(length, self.max_attempts))
    }

    /// Shortens a single URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL lacks an `http://` or
    /// `https://` prefix, is too long, or `length` is out of range. Nothing is
    /// stored in that case.
    ///
    /// Returns [`AppError::Internal`] if allocation is exhausted or storage fails.
    pub async fn shorten(
        &self,
        original_url: String,
        length: usize,
    ) -> Result<ShortenedUrl, AppError> {
        if !is_acceptable_url(&original_url) {
            return Err(AppError::invalid_url_format(&original_url));
        }
        ensure_valid_length(length)?;

        for _ in 0..self.max_attempts {
            let code = self.allocate_code(length).await?;

            match self
                .repository
                .create(NewUrlRecord::new(code, original_url.clone()))
                .await
            {
                Ok(record) => {
                    metrics::counter!("shorturl_links_created_total").increment(1);
                    return Ok(self.to_shortened(record));
                }
                Err(e) if e.is_duplicate_code() => {
                    metrics::counter!("shorturl_code_collisions_total").increment(1);
                    warn!("Short code taken between check and insert, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::code_space_exhausted(length, self.max_attempts))
    }

    /// Shortens several URLs at once.
    ///
    /// URLs without an `http://` or `https://` prefix are skipped silently. The
    /// remaining ones are stored together (all-or-nothing) and returned in input
    /// order. If the batch collides with a concurrent writer, every code is
    /// re-allocated and the batch retried.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `length` is out of range.
    /// Returns [`AppError::Internal`] if allocation is exhausted or storage fails.
    pub async fn shorten_bulk(
        &self,
        urls: Vec<String>,
        length: usize,
    ) -> Result<Vec<ShortenedUrl>, AppError> {
        ensure_valid_length(length)?;

        let accepted: Vec<String> = urls
            .into_iter()
            .filter(|url| {
                let ok = is_acceptable_url(url);
                if !ok {
                    debug!(url = %url, "Skipping URL without http(s) prefix");
                }
                ok
            })
            .collect();

        if accepted.is_empty() {
            return Ok(Vec::new());
        }

        for _ in 0..self.max_attempts {
            let entries = self.allocate_batch(&accepted, length).await?;

            match self.repository.create_bulk(entries).await {
                Ok(records) => {
                    metrics::counter!("shorturl_links_created_total")
                        .increment(records.len() as u64);
                    return Ok(records
                        .into_iter()
                        .map(|record| self.to_shortened(record))
                        .collect());
                }
                Err(e) if e.is_duplicate_code() => {
                    metrics::counter!("shorturl_code_collisions_total").increment(1);
                    warn!(size = accepted.len(), "Bulk insert hit a taken code, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::code_space_exhausted(length, self.max_attempts))
    }

    /// Allocates one code per URL, distinct within the batch.
    async fn allocate_batch(
        &self,
        urls: &[String],
        length: usize,
    ) -> Result<Vec<NewUrlRecord>, AppError> {
        let mut seen = HashSet::with_capacity(urls.len());
        let mut entries = Vec::with_capacity(urls.len());

        for url in urls {
            let mut code = self.allocate_code(length).await?;
            let mut attempts = 1;

            while !seen.insert(code.clone()) {
                if attempts >= self.max_attempts {
                    return Err(AppError::code_space_exhausted(length, self.max_attempts));
                }
                code = self.allocate_code(length).await?;
                attempts += 1;
            }

            entries.push(NewUrlRecord::new(code, url.clone()));
        }

        Ok(entries)
    }

    fn to_shortened(&self, record: UrlRecord) -> ShortenedUrl {
        ShortenedUrl {
            id: record.id,
            short_url: self.short_url(&record.short_code),
            original_url: record.original_url,
            short_code: record.short_code,
        }
    }
}

fn ensure_valid_length(length: usize) -> Result<(), AppError> {
    if is_valid_length(length) {
        Ok(())
    } else {
        Err(AppError::bad_request(
            format!(
                "Code length must be between {} and {}",
                CODE_LENGTH_RANGE.start(),
                CODE_LENGTH_RANGE.end()
            ),
            json!({ "length": length }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;

    const DOMAIN: &str = "http://localhost:8000";

    fn record_from(id: i64, entry: &NewUrlRecord) -> UrlRecord {
        UrlRecord::new(
            id,
            entry.short_code.clone(),
            entry.original_url.clone(),
            0,
        )
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut mock = MockUrlRepository::new();
        mock.expect_exists().times(1).returning(|_| Ok(false));
        mock.expect_create()
            .withf(|entry| entry.original_url == "https://example.com/page")
            .times(1)
            .returning(|entry| Ok(record_from(1, &entry)));

        let service = ShortenService::new(Arc::new(mock), DOMAIN);

        let shortened = service
            .shorten("https://example.com/page".to_string(), 6)
            .await
            .unwrap();

        assert_eq!(shortened.short_code.len(), 6);
        assert_eq!(shortened.original_url, "https://example.com/page");
        assert_eq!(
            shortened.short_url,
            format!("{}/{}", DOMAIN, shortened.short_code)
        );
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_scheme_without_storage() {
        let mock = MockUrlRepository::new();
        let service = ShortenService::new(Arc::new(mock), DOMAIN);

        let result = service.shorten("ftp://example.com".to_string(), 6).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_length() {
        let mock = MockUrlRepository::new();
        let service = ShortenService::new(Arc::new(mock), DOMAIN);

        for length in [0, 3, 11] {
            let result = service
                .shorten("https://example.com".to_string(), length)
                .await;
            assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
        }
    }

    #[tokio::test]
    async fn test_allocate_code_retries_on_existing_code() {
        let mut mock = MockUrlRepository::new();
        let mut calls = 0;
        mock.expect_exists().times(3).returning(move |_| {
            calls += 1;
            Ok(calls < 3)
        });

        let service = ShortenService::new(Arc::new(mock), DOMAIN);

        let code = service.allocate_code(8).await.unwrap();
        assert_eq!(code.len(), 8);
    }

    #[tokio::test]
    async fn test_allocate_code_gives_up_after_cap() {
        let mut mock = MockUrlRepository::new();
        mock.expect_exists().times(5).returning(|_| Ok(true));

        let service = ShortenService::new(Arc::new(mock), DOMAIN).with_max_attempts(5);

        let result = service.allocate_code(4).await;
        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_retries_when_insert_loses_race() {
        let mut mock = MockUrlRepository::new();
        mock.expect_exists().times(2).returning(|_| Ok(false));

        let mut calls = 0;
        mock.expect_create().times(2).returning(move |entry| {
            calls += 1;
            if calls == 1 {
                Err(AppError::duplicate_code(&entry.short_code))
            } else {
                Ok(record_from(2, &entry))
            }
        });

        let service = ShortenService::new(Arc::new(mock), DOMAIN);

        let shortened = service
            .shorten("https://example.com".to_string(), 6)
            .await
            .unwrap();
        assert_eq!(shortened.id, 2);
    }

    #[tokio::test]
    async fn test_shorten_propagates_storage_error() {
        let mut mock = MockUrlRepository::new();
        mock.expect_exists()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        mock.expect_create().times(0);

        let service = ShortenService::new(Arc::new(mock), DOMAIN);

        let result = service.shorten("https://example.com".to_string(), 6).await;
        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_bulk_filters_and_keeps_order() {
        let mut mock = MockUrlRepository::new();
        mock.expect_exists().returning(|_| Ok(false));
        mock.expect_create_bulk()
            .withf(|entries| {
                entries.len() == 2
                    && entries[0].original_url == "https://a.com"
                    && entries[1].original_url == "http://b.com"
            })
            .times(1)
            .returning(|entries| {
                Ok(entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| record_from(i as i64 + 1, entry))
                    .collect())
            });

        let service = ShortenService::new(Arc::new(mock), DOMAIN);

        let results = service
            .shorten_bulk(
                vec![
                    "https://a.com".to_string(),
                    "not-a-url".to_string(),
                    "http://b.com".to_string(),
                ],
                6,
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].original_url, "https://a.com");
        assert_eq!(results[1].original_url, "http://b.com");
        assert!(results[0].short_url.starts_with(DOMAIN));
    }

    #[tokio::test]
    async fn test_shorten_bulk_with_nothing_valid_skips_storage() {
        let mut mock = MockUrlRepository::new();
        mock.expect_create_bulk().times(0);

        let service = ShortenService::new(Arc::new(mock), DOMAIN);

        let results = service
            .shorten_bulk(vec!["ftp://a.com".to_string()], 6)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_shorten_bulk_retries_whole_batch_on_conflict() {
        let mut mock = MockUrlRepository::new();
        mock.expect_exists().returning(|_| Ok(false));

        let mut calls = 0;
        mock.expect_create_bulk().times(2).returning(move |entries| {
            calls += 1;
            if calls == 1 {
                Err(AppError::duplicate_code(&entries[0].short_code))
            } else {
                Ok(entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| record_from(i as i64 + 1, entry))
                    .collect())
            }
        });

        let service = ShortenService::new(Arc::new(mock), DOMAIN);

        let results = service
            .shorten_bulk(vec!["https://a.com".to_string()], 6)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = ShortenService::new(
            Arc::new(MockUrlRepository::new()),
            "https://s.example.com/",
        );

        assert_eq!(service.short_url("Ab12"), "https://s.example.com/Ab12");
    }
}
