// src/handlers/course.rs

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
        course::{Course, CreateCoursePayload, UpdateCoursePayload},
        dashboard::EntityStats,
    },
};

// POST /api/courses
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "Courses",
    request_body = CreateCoursePayload,
    responses(
        (status = 201, description = "Curso criado (sem franchiseId = curso global)", body = Course),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_course(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreateCoursePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let course = app_state.course_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(course)))
}

// GET /api/courses
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "Courses",
    responses(
        (status = 200, description = "Cursos da franquia de quem chama e cursos globais", body = Vec<Course>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_courses(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let courses = app_state.course_service.list(&scope).await?;
    Ok((StatusCode::OK, Json(courses)))
}

// GET /api/courses/stats
#[utoipa::path(
    get,
    path = "/api/courses/stats",
    tag = "Courses",
    responses(
        (status = 200, description = "Contagem de cursos ativos/inativos", body = EntityStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn course_stats(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.course_service.stats(&scope).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/courses/{id}
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "Courses",
    params(("id" = i64, Path, description = "ID do curso")),
    responses(
        (status = 200, description = "Curso", body = Course),
        (status = 404, description = "Não encontrado (ou fora do escopo)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_course(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course = app_state.course_service.get(&scope, id).await?;
    Ok((StatusCode::OK, Json(course)))
}

// PUT /api/courses/{id}
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = "Courses",
    params(("id" = i64, Path, description = "ID do curso")),
    request_body = UpdateCoursePayload,
    responses(
        (status = 200, description = "Curso atualizado", body = Course),
        (status = 403, description = "Apenas admin"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_course(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCoursePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let course = app_state.course_service.update(id, payload).await?;

    Ok((StatusCode::OK, Json(course)))
}

// DELETE /api/courses/{id}
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "Courses",
    params(("id" = i64, Path, description = "ID do curso")),
    responses(
        (status = 204, description = "Curso removido"),
        (status = 403, description = "Apenas admin"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_course(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.course_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
