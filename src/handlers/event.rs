// src/handlers/event.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{Managers, RequireRole},
        scope::CallerScope,
    },
    models::event::{CreateEventPayload, Event, UpdateEventPayload},
};

// POST /api/events
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventPayload,
    responses(
        (status = 201, description = "Evento criado", body = Event),
        (status = 403, description = "Apenas admin ou franchise_head")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let event = app_state.event_service.create(&scope, payload).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses(
        (status = 200, description = "Eventos da franquia de quem chama e eventos globais", body = Vec<Event>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let events = app_state.event_service.list(&scope).await?;
    Ok((StatusCode::OK, Json(events)))
}

// GET /api/events/{id}
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = i64, Path, description = "ID do evento")),
    responses(
        (status = 200, description = "Evento", body = Event),
        (status = 404, description = "Não encontrado (ou fora do escopo)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_event(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state.event_service.get(&scope, id).await?;
    Ok((StatusCode::OK, Json(event)))
}

// PUT /api/events/{id}
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = i64, Path, description = "ID do evento")),
    request_body = UpdateEventPayload,
    responses(
        (status = 200, description = "Evento atualizado", body = Event),
        (status = 403, description = "Sem permissão (evento global ou outra franquia)"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_event(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let event = app_state.event_service.update(&scope, id, payload).await?;

    Ok((StatusCode::OK, Json(event)))
}

// DELETE /api/events/{id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = i64, Path, description = "ID do evento")),
    responses(
        (status = 204, description = "Evento removido"),
        (status = 403, description = "Apenas admin ou franchise_head"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_event(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.event_service.delete(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
