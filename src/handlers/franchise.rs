// src/handlers/franchise.rs

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
        rbac::{AdminOnly, RequireRole},
        scope::CallerScope,
    },
    models::{
        dashboard::EntityStats,
        franchise::{CreateFranchisePayload, Franchise, FranchiseOption, UpdateFranchisePayload},
    },
};

// POST /api/franchises
#[utoipa::path(
    post,
    path = "/api/franchises",
    tag = "Franchises",
    request_body = CreateFranchisePayload,
    responses(
        (status = 201, description = "Franquia criada (e franchise_head, se pedido)", body = Franchise),
        (status = 400, description = "Payload inválido"),
        (status = 403, description = "Apenas admin"),
        (status = 409, description = "E-mail do franchise_head já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_franchise(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreateFranchisePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let franchise = app_state.franchise_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(franchise)))
}

// GET /api/franchises
#[utoipa::path(
    get,
    path = "/api/franchises",
    tag = "Franchises",
    responses(
        (status = 200, description = "Franquias visíveis para quem chama", body = Vec<Franchise>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_franchises(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let franchises = app_state.franchise_service.list(&scope).await?;
    Ok((StatusCode::OK, Json(franchises)))
}

// GET /api/franchises/options
#[utoipa::path(
    get,
    path = "/api/franchises/options",
    tag = "Franchises",
    responses(
        (status = 200, description = "Lista {id, name} para dropdowns", body = Vec<FranchiseOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_franchise_options(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let options = app_state.franchise_service.options(&scope).await?;
    Ok((StatusCode::OK, Json(options)))
}

// GET /api/franchises/stats
#[utoipa::path(
    get,
    path = "/api/franchises/stats",
    tag = "Franchises",
    responses(
        (status = 200, description = "Contagem de franquias ativas/inativas", body = EntityStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn franchise_stats(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.franchise_service.stats(&scope).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/franchises/{id}
#[utoipa::path(
    get,
    path = "/api/franchises/{id}",
    tag = "Franchises",
    params(("id" = i64, Path, description = "ID da franquia")),
    responses(
        (status = 200, description = "Franquia", body = Franchise),
        (status = 404, description = "Não encontrada (ou fora do escopo)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_franchise(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let franchise = app_state.franchise_service.get(&scope, id).await?;
    Ok((StatusCode::OK, Json(franchise)))
}

// PUT /api/franchises/{id}
#[utoipa::path(
    put,
    path = "/api/franchises/{id}",
    tag = "Franchises",
    params(("id" = i64, Path, description = "ID da franquia")),
    request_body = UpdateFranchisePayload,
    responses(
        (status = 200, description = "Franquia atualizada", body = Franchise),
        (status = 403, description = "Apenas admin"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_franchise(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateFranchisePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let franchise = app_state.franchise_service.update(id, payload).await?;

    Ok((StatusCode::OK, Json(franchise)))
}

// DELETE /api/franchises/{id}
#[utoipa::path(
    delete,
    path = "/api/franchises/{id}",
    tag = "Franchises",
    params(("id" = i64, Path, description = "ID da franquia")),
    responses(
        (status = 204, description = "Franquia removida (o franchise_head é removido em seguida, best-effort)"),
        (status = 403, description = "Apenas admin"),
        (status = 404, description = "Não encontrada"),
        (status = 409, description = "Ainda há alunos vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_franchise(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.franchise_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
