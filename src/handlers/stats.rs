use super::AppState;
use crate::errors::ServiceError;
use crate::services::stats::DashboardStats;
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/api/stats",
    summary = "Dashboard stats",
    description = "Total users, total orders and revenue from items that were not cancelled or returned",
    responses(
        (status = 200, description = "Stats computed successfully", body = DashboardStats),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "stats"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ServiceError> {
    let stats = state.services.stats.dashboard_stats().await?;
    Ok(Json(stats))
}
