// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, scope::CallerScope},
    models::auth::{LoginPayload, LoginResponse, MeResponse, RefreshPayload, TokenPair},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = LoginResponse),
        (status = 400, description = "Payload inválido"),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Conta com outro papel")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state.auth_service.login(&payload).await?;

    Ok((StatusCode::OK, Json(response)))
}

// POST /api/auth/refresh
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    request_body = RefreshPayload,
    responses(
        (status = 200, description = "Novo par de tokens", body = TokenPair),
        (status = 401, description = "Refresh token inválido ou expirado")
    )
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tokens = app_state.auth_service.refresh(&payload.refresh_token).await?;

    Ok((StatusCode::OK, Json(tokens)))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Principal autenticado e o seu escopo", body = MeResponse),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_me(
    AuthenticatedUser(principal): AuthenticatedUser,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, Json(MeResponse { principal, scope })))
}
