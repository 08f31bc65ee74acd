use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_cookies::Cookies;

use crate::{
    flash::{Flash, redirect_with, take_flash},
    models::analytics::AnalyticsSummary,
    services::analytics as analytics_service,
    state::AppState,
};

#[derive(Serialize)]
pub struct AnalyticsPage {
    #[serde(flatten)]
    pub summary: AnalyticsSummary,
    pub flash: Option<Flash>,
}

/// Aggregate statistics over the whole catalog.
pub async fn analytics(State(state): State<AppState>, cookies: Cookies) -> Response {
    match analytics_service::load_summary(&state).await {
        Ok(summary) => Json(AnalyticsPage {
            summary,
            flash: take_flash(&cookies),
        })
        .into_response(),
        Err(e) => {
            redirect_with(&cookies, "/owners/dashboard", Flash::from_error(&e)).into_response()
        }
    }
}
