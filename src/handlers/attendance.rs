// src/handlers/attendance.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{AttendanceTakers, RequireRole},
        scope::CallerScope,
    },
    models::attendance::{AttendanceQuery, AttendanceSubmission, AttendanceView, MonthlyAttendanceQuery},
};

// GET /api/attendance?franchise=&date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/attendance",
    tag = "Attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Presenças do dia (lista vazia se faltar data ou franquia)", body = Vec<AttendanceView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_attendance(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Query(query): Query<AttendanceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state.attendance_service.list_attendance(&scope, &query).await?;
    Ok((StatusCode::OK, Json(records)))
}

// POST /api/attendance
// Aceita `[...]` ou `{ "records": [...] }`. Reenviar a mesma chave sobrescreve.
#[utoipa::path(
    post,
    path = "/api/attendance",
    tag = "Attendance",
    request_body = AttendanceSubmission,
    responses(
        (status = 200, description = "Registros gravados, na ordem do lote", body = Vec<AttendanceView>),
        (status = 400, description = "Erros por campo, indexados pela posição no lote"),
        (status = 403, description = "Sem permissão para registrar presença")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_attendance(
    State(app_state): State<AppState>,
    _guard: RequireRole<AttendanceTakers>,
    CallerScope(scope): CallerScope,
    Json(submission): Json<AttendanceSubmission>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state
        .attendance_service
        .upsert_attendance(&scope, submission.into_records())
        .await?;

    Ok((StatusCode::OK, Json(records)))
}

// GET /api/attendance/monthly?franchise=&month=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/attendance/monthly",
    tag = "Attendance",
    params(MonthlyAttendanceQuery),
    responses(
        (status = 200, description = "Presenças do mês (lista vazia se o mês for inválido)", body = Vec<AttendanceView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn monthly_attendance(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Query(query): Query<MonthlyAttendanceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state.attendance_service.monthly_attendance(&scope, &query).await?;
    Ok((StatusCode::OK, Json(records)))
}
