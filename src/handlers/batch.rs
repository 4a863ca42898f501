// src/handlers/batch.rs

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
    models::{
        dashboard::EntityStats,
        batch::{Batch, CreateBatchPayload, UpdateBatchPayload},
    },
};

// POST /api/batches
#[utoipa::path(
    post,
    path = "/api/batches",
    tag = "Batches",
    request_body = CreateBatchPayload,
    responses(
        (status = 201, description = "Turma criada (admin pode criar turmas globais)", body = Batch),
        (status = 400, description = "Payload inválido (fim antes do início)"),
        (status = 403, description = "Apenas admin ou franchise_head"),
        (status = 404, description = "Franquia informada não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_batch(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Json(payload): Json<CreateBatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let batch = app_state.batch_service.create(&scope, payload).await?;

    Ok((StatusCode::CREATED, Json(batch)))
}

// GET /api/batches
#[utoipa::path(
    get,
    path = "/api/batches",
    tag = "Batches",
    responses(
        (status = 200, description = "Turmas da franquia de quem chama e turmas globais", body = Vec<Batch>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_batches(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let batch = app_state.batch_service.list(&scope).await?;
    Ok((StatusCode::OK, Json(batch)))
}

// GET /api/batches/stats
#[utoipa::path(
    get,
    path = "/api/batches/stats",
    tag = "Batches",
    responses(
        (status = 200, description = "Contagem de turmas ativas/inativas", body = EntityStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn batch_stats(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.batch_service.stats(&scope).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/batches/{id}
#[utoipa::path(
    get,
    path = "/api/batches/{id}",
    tag = "Batches",
    params(("id" = i64, Path, description = "ID da turma")),
    responses(
        (status = 200, description = "Turma", body = Batch),
        (status = 404, description = "Não encontrada (ou fora do escopo)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_batch(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let batch = app_state.batch_service.get(&scope, id).await?;
    Ok((StatusCode::OK, Json(batch)))
}

// PUT /api/batches/{id}
#[utoipa::path(
    put,
    path = "/api/batches/{id}",
    tag = "Batches",
    params(("id" = i64, Path, description = "ID da turma")),
    request_body = UpdateBatchPayload,
    responses(
        (status = 200, description = "Turma atualizada", body = Batch),
        (status = 403, description = "Sem permissão (ou tentativa de mover para outra franquia)"),
        (status = 404, description = "Não encontrada"),
        (status = 400, description = "Fim antes do início")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_batch(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBatchPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let batch = app_state.batch_service.update(&scope, id, payload).await?;

    Ok((StatusCode::OK, Json(batch)))
}

// DELETE /api/batches/{id}
#[utoipa::path(
    delete,
    path = "/api/batches/{id}",
    tag = "Batches",
    params(("id" = i64, Path, description = "ID da turma")),
    responses(
        (status = 204, description = "Turma removida"),
        (status = 403, description = "Apenas admin ou franchise_head"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_batch(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.batch_service.delete(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
