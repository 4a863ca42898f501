// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::scope::Scope;

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    FranchiseHead,
    Staff,
    Student,
}

impl Role {
    /// Página inicial do frontend para cada papel.
    pub fn landing_page(self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::FranchiseHead => "/franchise/dashboard",
            Role::Staff => "/staff/dashboard",
            Role::Student => "/login",
        }
    }
}

// Representa um principal (conta de login) vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: i64,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "Invalid email address."))]
    #[schema(example = "head@franchise.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,

    // Papel esperado pela tela de login; se vier e não bater, 403.
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPayload {
    #[validate(length(min = 1, message = "Refresh token is required."))]
    pub refresh_token: String,
}

// Credenciais de uma conta provisionada junto com a entidade (franquia, staff)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AccountCredentials {
    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

// Resposta de autenticação com o par de tokens
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub role: Role,
    pub email: String,
    #[schema(example = "/franchise/dashboard")]
    pub redirect_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub principal: Principal,
    pub scope: Scope,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,        // Subject (ID do principal)
    pub role: Role,
    pub kind: TokenKind,
    pub jti: Uuid,
    pub exp: usize,      // Expiration time
    pub iat: usize,      // Issued At
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_snake_case_on_the_wire() {
        let role: Role = serde_json::from_str("\"franchise_head\"").unwrap();
        assert_eq!(role, Role::FranchiseHead);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn landing_pages_follow_role() {
        assert_eq!(Role::Admin.landing_page(), "/admin/dashboard");
        assert_eq!(Role::FranchiseHead.landing_page(), "/franchise/dashboard");
        assert_eq!(Role::Staff.landing_page(), "/staff/dashboard");
        assert_eq!(Role::Student.landing_page(), "/login");
    }
}
