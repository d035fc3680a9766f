//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

const INSERT_RECORD: &str = r#"
    INSERT INTO urls (short_code, original_url)
    VALUES ($1, $2)
    RETURNING id, short_code, original_url, clicks
"#;

/// PostgreSQL repository for URL records.
///
/// Every call runs as its own statement on a pooled connection, except
/// [`UrlRepository::create_bulk`], which wraps the batch in one transaction.
/// Duplicate short codes are caught by the `urls_short_code_key` constraint and
/// surface as [`AppError::Conflict`].
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn exists(&self, short_code: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = $1)",
        )
        .bind(short_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let record = sqlx::query_as::<_, UrlRecord>(INSERT_RECORD)
            .bind(&new_record.short_code)
            .bind(&new_record.original_url)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(record)
    }

    async fn create_bulk(&self, entries: Vec<NewUrlRecord>) -> Result<Vec<UrlRecord>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut records = Vec::with_capacity(entries.len());

        for entry in &entries {
            let record = sqlx::query_as::<_, UrlRecord>(INSERT_RECORD)
                .bind(&entry.short_code)
                .bind(&entry.original_url)
                .fetch_one(&mut *tx)
                .await?;
            records.push(record);
        }

        tx.commit().await?;

        Ok(records)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError> {
        let record = sqlx::query_as::<_, UrlRecord>(
            "SELECT id, short_code, original_url, clicks FROM urls WHERE short_code = $1",
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        let record = sqlx::query_as::<_, UrlRecord>(
            "SELECT id, short_code, original_url, clicks FROM urls WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE urls SET clicks = clicks + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<UrlRecord>, AppError> {
        let offset = (page.max(1) - 1).saturating_mul(page_size);

        let records = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, short_code, original_url, clicks
            FROM urls
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
