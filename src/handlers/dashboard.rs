// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::scope::CallerScope,
    models::dashboard::DashboardSummary,
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contadores do dashboard no escopo de quem chama", body = DashboardSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard_summary(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.get_summary(&scope).await?;
    Ok((StatusCode::OK, Json(summary)))
}
