//! Shared application state injected into every handler.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{RedirectService, ShortenService, StatsService};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::UrlRepository;

/// Basic auth credentials for the admin dashboard.
///
/// Only SHA-256 digests are kept, and comparisons run on digests so their
/// timing does not depend on how much of the submitted value matches.
#[derive(Clone)]
pub struct AdminCredentials {
    username_hash: [u8; 32],
    password_hash: [u8; 32],
}

impl AdminCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username_hash: digest(username),
            password_hash: digest(password),
        }
    }

    /// Returns true if both values match the configured credentials.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(&digest(username), &self.username_hash);
        let pass_ok = constant_time_eq(&digest(password), &self.password_hash);
        user_ok & pass_ok
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Shared state cloned into each request.
///
/// Services hold the storage handle behind `Arc<dyn UrlRepository>`, so the
/// process-wide connection pool is created once and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService<dyn UrlRepository>>,
    pub redirect_service: Arc<RedirectService<dyn UrlRepository>>,
    pub stats_service: Arc<StatsService<dyn UrlRepository>>,
    pub default_code_length: usize,
    pub admin: AdminCredentials,
}

impl AppState {
    /// Wires all services around a single repository.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        click_sender: mpsc::Sender<ClickEvent>,
        short_url_domain: &str,
        default_code_length: usize,
        admin: AdminCredentials,
    ) -> Self {
        Self {
            shorten_service: Arc::new(ShortenService::new(
                repository.clone(),
                short_url_domain,
            )),
            redirect_service: Arc::new(RedirectService::new(repository.clone(), click_sender)),
            stats_service: Arc::new(StatsService::new(repository)),
            default_code_length,
            admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_credentials_verify() {
        let creds = AdminCredentials::new("admin", "s3cret");

        assert!(creds.verify("admin", "s3cret"));
        assert!(!creds.verify("admin", "wrong"));
        assert!(!creds.verify("root", "s3cret"));
        assert!(!creds.verify("", ""));
    }
}
