//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Deferred click increment message
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. Redirect resolves a short code to its record
//! 2. [`click_event::ClickEvent`] is pushed to a bounded channel without waiting
//! 3. [`click_worker::run_click_worker`] applies the increment with retry logic
//! 4. The counter is bumped via [`repositories::UrlRepository::increment_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
