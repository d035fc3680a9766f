//! Background worker applying deferred click counter increments.
//!
//! The worker owns the receiving half of the click channel and runs detached
//! from any request. It exits once every sender has been dropped and the queue
//! is drained, which is how graceful shutdown flushes pending clicks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::UrlRepository;

/// Retries after the first failed increment.
const MAX_RETRIES: usize = 3;

/// Base delay of the exponential backoff between retries.
const RETRY_BASE_MILLIS: u64 = 10;

/// Consumes click events and increments the matching counters.
///
/// Up to `concurrency` increments run at once. A failed increment is retried
/// with exponential backoff; if it still fails, the click is logged and dropped.
pub async fn run_click_worker<R>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: UrlRepository + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        tasks.spawn(async move {
            let _permit = permit;
            record_click(repository.as_ref(), event).await;
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}

    info!("Click worker stopped");
}

/// Applies a single click increment with bounded retries.
async fn record_click<R>(repository: &R, event: ClickEvent)
where
    R: UrlRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MILLIS)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = Retry::spawn(strategy, move || async move {
        repository.increment_clicks(event.url_id).await.inspect_err(|e| {
            warn!(url_id = event.url_id, error = %e, "Click increment failed");
        })
    })
    .await;

    match result {
        Ok(true) => {
            metrics::counter!("shorturl_clicks_recorded_total").increment(1);
        }
        Ok(false) => {
            debug!(url_id = event.url_id, "Click for unknown record ignored");
        }
        Err(e) => {
            metrics::counter!("shorturl_clicks_failed_total").increment(1);
            error!(url_id = event.url_id, error = %e, "Dropping click after retries");
        }
    }
}
