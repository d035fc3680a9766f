//! Click event model for asynchronous click tracking.

/// A pending click counter increment.
///
/// Created by the redirect path after a successful lookup and sent to the
/// background worker through a bounded channel, so the redirect response never
/// waits on the database write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub url_id: i64,
}

impl ClickEvent {
    pub fn new(url_id: i64) -> Self {
        Self { url_id }
    }
}
