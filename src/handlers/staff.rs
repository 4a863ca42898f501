// src/handlers/staff.rs

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
        staff::{CreateStaffPayload, Staff, StaffView, UpdateStaffPayload},
    },
};

// POST /api/staff
#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    request_body = CreateStaffPayload,
    responses(
        (status = 201, description = "Staff e conta de login criados", body = Staff),
        (status = 400, description = "Payload inválido (admin precisa informar franchiseId)"),
        (status = 403, description = "Apenas admin ou franchise_head"),
        (status = 409, description = "E-mail ou telefone já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_staff(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Json(payload): Json<CreateStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let staff = app_state.staff_service.create(&scope, payload).await?;

    Ok((StatusCode::CREATED, Json(staff)))
}

// GET /api/staff
#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    responses(
        (status = 200, description = "Staff visível para quem chama, mais novos primeiro", body = Vec<StaffView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_staff(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let staff = app_state.staff_service.list(&scope).await?;
    Ok((StatusCode::OK, Json(staff)))
}

// GET /api/staff/stats
#[utoipa::path(
    get,
    path = "/api/staff/stats",
    tag = "Staff",
    responses(
        (status = 200, description = "Contagem de staff ativo/inativo", body = EntityStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn staff_stats(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.staff_service.stats(&scope).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/staff/{id}
#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = i64, Path, description = "ID do staff")),
    responses(
        (status = 200, description = "Staff", body = StaffView),
        (status = 404, description = "Não encontrado (ou fora do escopo)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_staff(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let staff = app_state.staff_service.get(&scope, id).await?;
    Ok((StatusCode::OK, Json(staff)))
}

// PUT /api/staff/{id}
#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = i64, Path, description = "ID do staff")),
    request_body = UpdateStaffPayload,
    responses(
        (status = 200, description = "Staff atualizado", body = Staff),
        (status = 403, description = "Sem permissão (ou tentativa de mover para outra franquia)"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Telefone já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_staff(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let staff = app_state.staff_service.update(&scope, id, payload).await?;

    Ok((StatusCode::OK, Json(staff)))
}

// DELETE /api/staff/{id}
#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = i64, Path, description = "ID do staff")),
    responses(
        (status = 204, description = "Staff removido (a conta de login é removida em seguida, best-effort)"),
        (status = 403, description = "Apenas admin ou franchise_head"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_staff(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.staff_service.delete(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
