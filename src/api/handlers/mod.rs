//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod dashboard;
pub mod health;
pub mod redirect;
pub mod shorten;

pub use dashboard::dashboard_handler;
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::{bulk_shorten_handler, shorten_handler};
