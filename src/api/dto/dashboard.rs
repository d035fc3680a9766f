//! Query parameters for the admin dashboard.

use serde::Deserialize;

/// Pagination query for the dashboard listing.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    25
}
