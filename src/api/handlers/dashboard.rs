//! Admin dashboard listing stored links and their click counts.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};

use crate::api::dto::dashboard::DashboardQuery;
use crate::application::services::RecordPage;
use crate::error::AppError;
use crate::state::AppState;

/// Template for the dashboard page.
///
/// Renders `templates/dashboard.html`.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub page: RecordPage,
    pub short_url_prefix: String,
}

/// Renders the admin dashboard.
///
/// # Endpoint
///
/// `GET /shorturl/private?page=1&page_size=25`
///
/// Protected by HTTP Basic auth, see [`crate::api::middleware::admin_auth`].
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<DashboardTemplate, AppError> {
    let page = state
        .stats_service
        .page(query.page, query.page_size)
        .await?;

    Ok(DashboardTemplate {
        page,
        short_url_prefix: state.shorten_service.short_url(""),
    })
}
