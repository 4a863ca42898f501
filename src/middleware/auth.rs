// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::Principal};

// Autenticação opcional: sem token a requisição segue anônima (escopo vazio);
// com token inválido ou expirado responde 401 para o cliente renovar a sessão.
pub async fn auth_layer(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() {
        let principal = app_state.auth_service.validate_access_token(bearer.token()).await?;
        // Insere o principal nos "extensions" da requisição
        request.extensions_mut().insert(principal);
    }
    Ok(next.run(request).await)
}

// Extrator para obter o principal autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub Principal);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
