//! Short code resolution with deferred click tracking.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::is_valid_code;

/// Resolves short codes to their original URLs.
///
/// A successful lookup pushes a [`ClickEvent`] to the click worker with
/// `try_send` and returns at once. The increment is never awaited, so a slow or
/// failing database cannot delay the redirect, and a full queue only drops the
/// click.
pub struct RedirectService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    click_sender: mpsc::Sender<ClickEvent>,
}

impl<R: UrlRepository + ?Sized> RedirectService<R> {
    pub fn new(repository: Arc<R>, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        Self {
            repository,
            click_sender,
        }
    }

    /// Returns the original URL for `code` and schedules a click increment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this code. Codes that
    /// cannot exist (wrong length or characters) are rejected without a lookup.
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !is_valid_code(code) {
            return Err(not_found(code));
        }

        let record = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        self.schedule_click(record.id);
        metrics::counter!("shorturl_redirects_total").increment(1);

        Ok(record.original_url)
    }

    /// Looks up a record by id without touching its click counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn get_record(&self, id: i64) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "id": id })))
    }

    /// Queues a click increment without waiting.
    fn schedule_click(&self, url_id: i64) {
        match self.click_sender.try_send(ClickEvent::new(url_id)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                metrics::counter!("shorturl_clicks_dropped_total").increment(1);
                warn!(url_id, "Click queue full, dropping click");
            }
            Err(TrySendError::Closed(_)) => {
                metrics::counter!("shorturl_clicks_dropped_total").increment(1);
                error!(url_id, "Click queue closed, dropping click");
            }
        }
    }

    /// Returns true if the click worker is no longer receiving events.
    pub fn is_click_queue_closed(&self) -> bool {
        self.click_sender.is_closed()
    }

    /// Remaining free slots in the click queue.
    pub fn click_queue_capacity(&self) -> usize {
        self.click_sender.capacity()
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "code": code }))
}
