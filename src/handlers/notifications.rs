// src/handlers/notifications.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::scope::CallerScope,
    models::notification::{Notification, UnreadCount},
};

// GET /api/notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    responses(
        (status = 200, description = "Notificações visíveis para quem chama, mais novas primeiro", body = Vec<Notification>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let notifications = app_state.notification_service.list(&scope).await?;
    Ok((StatusCode::OK, Json(notifications)))
}

// POST /api/notifications/{id}/read
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = i64, Path, description = "ID da notificação")),
    responses(
        (status = 204, description = "Marcada como lida"),
        (status = 404, description = "Não encontrada (ou fora do escopo)")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_notification_read(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.notification_service.mark_read(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/notifications/read-all
#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    tag = "Notifications",
    responses(
        (status = 200, description = "Quantidade marcada como lida: `{ \"updated\": n }`")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_all_notifications_read(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state.notification_service.mark_all_read(&scope).await?;
    Ok((StatusCode::OK, Json(json!({ "updated": updated }))))
}

// GET /api/notifications/unread-count
#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    tag = "Notifications",
    responses(
        (status = 200, description = "Não lidas no escopo", body = UnreadCount)
    ),
    security(("api_jwt" = []))
)]
pub async fn unread_count(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let unread = app_state.notification_service.unread_count(&scope).await?;
    Ok((StatusCode::OK, Json(UnreadCount { unread })))
}
