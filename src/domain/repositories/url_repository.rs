//! Repository trait for URL record data access.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage interface for short code mappings and their click counters.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Returns true iff a record with this short code exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn exists(&self, short_code: &str) -> Result<bool, AppError>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken. This is
    /// the write-time race detection the allocator relies on.
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Inserts several records as one unit.
    ///
    /// All-or-nothing: if any entry fails, none are stored. Records are returned
    /// in input order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if any short code is already taken or
    /// repeats within the batch.
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create_bulk(&self, entries: Vec<NewUrlRecord>) -> Result<Vec<UrlRecord>, AppError>;

    /// Finds a record by short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError>;

    /// Atomically adds one to the record's click counter.
    ///
    /// Returns `Ok(false)` if no record has this id; nothing is changed then.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError>;

    /// Lists records newest first.
    ///
    /// # Arguments
    ///
    /// - `page` - Page number (1-indexed)
    /// - `page_size` - Number of items per page
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<UrlRecord>, AppError>;

    /// Counts all records.
    async fn count(&self) -> Result<i64, AppError>;
}
