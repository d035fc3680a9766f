//! Paginated record listing for the admin dashboard.

use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Largest page size the dashboard may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// One page of records with totals.
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub records: Vec<UrlRecord>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_clicks: i64,
}

impl RecordPage {
    pub fn total_pages(&self) -> i64 {
        page_count(self.total, self.page_size)
    }
}

/// Number of pages needed for `total` records, at least 1.
fn page_count(total: i64, page_size: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total - 1) / page_size + 1
    }
}

/// Service for browsing stored records and their click counts.
pub struct StatsService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UrlRepository + ?Sized> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns a page of records, newest first.
    ///
    /// `page_size` is clamped to 1..=[`MAX_PAGE_SIZE`] and `page` to the
    /// existing pages, so a page past the end shows the last one.
    /// `total_clicks` sums only the records on this page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn page(&self, page: i64, page_size: i64) -> Result<RecordPage, AppError> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let total = self.repository.count().await?;
        let page = page.clamp(1, page_count(total, page_size));

        let records = self.repository.list(page, page_size).await?;
        let total_clicks = records.iter().map(|r| r.clicks).sum();

        Ok(RecordPage {
            records,
            page,
            page_size,
            total,
            total_clicks,
        })
    }

    /// Counts all stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn total(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}
