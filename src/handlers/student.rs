// src/handlers/student.rs

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
        student::{CreateStudentPayload, Student, StudentView, UpdateStudentPayload},
    },
};

// POST /api/students
#[utoipa::path(
    post,
    path = "/api/students",
    tag = "Students",
    request_body = CreateStudentPayload,
    responses(
        (status = 201, description = "Aluno criado", body = Student),
        (status = 400, description = "Payload inválido (admin precisa informar franchiseId)"),
        (status = 403, description = "Apenas admin ou franchise_head"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_student(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Json(payload): Json<CreateStudentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let student = app_state.student_service.create(&scope, payload).await?;

    Ok((StatusCode::CREATED, Json(student)))
}

// GET /api/students
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    responses(
        (status = 200, description = "Alunos visíveis para quem chama (staff: só a própria turma)", body = Vec<StudentView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_students(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let student = app_state.student_service.list(&scope).await?;
    Ok((StatusCode::OK, Json(student)))
}

// GET /api/students/stats
#[utoipa::path(
    get,
    path = "/api/students/stats",
    tag = "Students",
    responses(
        (status = 200, description = "Contagem de alunos ativos/inativos", body = EntityStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn student_stats(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.student_service.stats(&scope).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/students/{id}
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    tag = "Students",
    params(("id" = i64, Path, description = "ID do aluno")),
    responses(
        (status = 200, description = "Aluno", body = StudentView),
        (status = 404, description = "Não encontrado (ou fora do escopo)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_student(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let student = app_state.student_service.get(&scope, id).await?;
    Ok((StatusCode::OK, Json(student)))
}

// PUT /api/students/{id}
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    tag = "Students",
    params(("id" = i64, Path, description = "ID do aluno")),
    request_body = UpdateStudentPayload,
    responses(
        (status = 200, description = "Aluno atualizado", body = Student),
        (status = 403, description = "Sem permissão (ou tentativa de mover para outra franquia)"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_student(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStudentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let student = app_state.student_service.update(&scope, id, payload).await?;

    Ok((StatusCode::OK, Json(student)))
}

// DELETE /api/students/{id}
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    tag = "Students",
    params(("id" = i64, Path, description = "ID do aluno")),
    responses(
        (status = 204, description = "Aluno removido"),
        (status = 403, description = "Apenas admin ou franchise_head"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_student(
    State(app_state): State<AppState>,
    _guard: RequireRole<Managers>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.student_service.delete(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
