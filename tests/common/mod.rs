#![allow(dead_code)]

use axum::{Router, middleware};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use shorturl::api::middleware::admin_auth;
use shorturl::api::routes::{admin_routes, public_routes, shorten_routes};
use shorturl::domain::click_event::ClickEvent;
use shorturl::domain::click_worker::run_click_worker;
use shorturl::domain::repositories::UrlRepository;
use shorturl::infrastructure::persistence::InMemoryUrlRepository;
use shorturl::state::{AdminCredentials, AppState};

pub const DOMAIN: &str = "http://localhost:8000";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "s3cret";
/// `Basic base64("admin:s3cret")`
pub const ADMIN_AUTH_HEADER: &str = "Basic YWRtaW46czNjcmV0";

/// State over a fresh in-memory store; click events stay in the returned receiver.
pub fn create_test_state() -> (
    AppState,
    mpsc::Receiver<ClickEvent>,
    Arc<InMemoryUrlRepository>,
) {
    let repository = Arc::new(InMemoryUrlRepository::new());
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        repository.clone(),
        tx,
        DOMAIN,
        6,
        AdminCredentials::new(ADMIN_USERNAME, ADMIN_PASSWORD),
    );

    (state, rx, repository)
}

/// State with a running click worker applying increments to the store.
pub fn create_state_with_worker() -> (AppState, Arc<InMemoryUrlRepository>) {
    let (state, rx, repository) = create_test_state();
    let worker_repo: Arc<dyn UrlRepository> = repository.clone();
    tokio::spawn(run_click_worker(rx, worker_repo, 4));

    (state, repository)
}

/// All routes without rate limiting, which needs a real peer address.
pub fn test_app(state: AppState) -> Router {
    let admin = admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        admin_auth::layer,
    ));

    Router::new()
        .merge(shorten_routes())
        .merge(admin)
        .merge(public_routes())
        .with_state(state)
}

/// Extracts the short code from a `{DOMAIN}/{code}` short URL.
pub fn code_of(short_url: &str) -> String {
    short_url
        .strip_prefix(&format!("{DOMAIN}/"))
        .expect("short URL starts with the configured domain")
        .to_string()
}

/// Waits until the record's click counter reaches `expected`.
pub async fn wait_for_clicks(repo: &InMemoryUrlRepository, code: &str, expected: i64) -> i64 {
    let mut clicks = 0;
    for _ in 0..200 {
        clicks = repo
            .find_by_code(code)
            .await
            .unwrap()
            .map(|r| r.clicks)
            .unwrap_or(0);
        if clicks >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    clicks
}
