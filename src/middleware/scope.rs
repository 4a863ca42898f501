// src/middleware/scope.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{auth::Principal, scope::Scope},
};

// O escopo de quem chama, resolvido uma vez por requisição.
// Sem principal o escopo é `Empty`: leituras voltam vazias, nunca 401.
#[derive(Debug, Clone)]
pub struct CallerScope(pub Scope);

impl<S> FromRequestParts<S> for CallerScope
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(resolved) = parts.extensions.get::<CallerScope>() {
            return Ok(resolved.clone());
        }

        let app_state = AppState::from_ref(state);
        let principal = parts.extensions.get::<Principal>();
        let scope = app_state.scope_service.resolve_scope(principal).await?;

        let resolved = CallerScope(scope);
        parts.extensions.insert(resolved.clone());
        Ok(resolved)
    }
}
