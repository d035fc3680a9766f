//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::UrlRepository`] trait and
//! provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Code allocation and link creation
//! - [`services::redirect_service::RedirectService`] - Code resolution and click scheduling
//! - [`services::stats_service::StatsService`] - Paginated record listing

pub mod services;
