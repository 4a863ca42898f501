// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Taxonomia de erros da API. Cada variante sabe o seu status HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    // Payloads validados com `#[derive(Validate)]`
    #[error("Invalid payload")]
    InvalidPayload(#[from] validator::ValidationErrors),

    // Erros de validação feitos à mão (ex: campos obrigatórios de negócio)
    #[error("{0}")]
    Validation(String),

    // Erros por campo (ex: "records[2].person_id" -> "required")
    #[error("One or more fields are invalid")]
    FieldErrors(BTreeMap<String, String>),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or missing authentication token")]
    InvalidToken,

    #[error("Role mismatch")]
    RoleMismatch,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn permission_denied(message: impl Into<String>) -> Self {
        AppError::PermissionDenied(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_) | AppError::Validation(_) | AppError::FieldErrors(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::RoleMismatch | AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_)
            | AppError::Internal(_)
            | AppError::Bcrypt(_)
            | AppError::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::InvalidPayload(errors) => {
                let mut details = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({ "error": "One or more fields are invalid.", "details": details })
            }
            AppError::FieldErrors(details) => {
                json!({ "error": "One or more fields are invalid.", "details": details })
            }
            // 500: o `tracing` loga o detalhe, o cliente recebe uma mensagem genérica.
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                match e {
                    AppError::Database(inner) => tracing::error!("Internal server error: {:?}", inner),
                    other => tracing::error!("Internal server error: {}", other),
                }
                json!({ "error": "An unexpected error occurred." })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_http_status() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::FieldErrors(BTreeMap::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::permission_denied("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("Staff").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("dup".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(AppError::NotFound("Franchise").to_string(), "Franchise not found");
    }
}
