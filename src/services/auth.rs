// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, LoginPayload, LoginResponse, Principal, Role, TokenKind, TokenPair},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    pool: PgPool,
    jwt_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        pool: PgPool,
        jwt_secret: String,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self { user_repo, pool, jwt_secret, access_ttl, refresh_ttl }
    }

    /// Confere e-mail e senha. Qualquer falha vira `InvalidCredentials`
    /// (não revela se o e-mail existe).
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AppError> {
        let principal = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = principal.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        Ok(principal)
    }

    // Fluxo completo da tela de login
    pub async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse, AppError> {
        let principal = self.authenticate(&payload.email, &payload.password).await?;

        // A tela de login de cada papel só aceita aquele papel
        if let Some(expected) = payload.role {
            if expected != principal.role {
                return Err(AppError::RoleMismatch);
            }
        }

        let tokens = self.issue_tokens(&principal)?;
        tracing::info!(principal = principal.id, role = ?principal.role, "Login efetuado");

        Ok(LoginResponse {
            tokens,
            role: principal.role,
            email: principal.email,
            redirect_url: principal.role.landing_page().to_string(),
        })
    }

    pub fn issue_tokens(&self, principal: &Principal) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: create_token(&self.jwt_secret, principal, TokenKind::Access, self.access_ttl)?,
            refresh_token: create_token(&self.jwt_secret, principal, TokenKind::Refresh, self.refresh_ttl)?,
        })
    }

    // Troca um refresh token válido por um novo par
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = decode_token(&self.jwt_secret, refresh_token, TokenKind::Refresh)?;
        let principal = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;
        self.issue_tokens(&principal)
    }

    // Recarrega o principal a cada requisição para enxergar mudanças de papel
    pub async fn validate_access_token(&self, token: &str) -> Result<Principal, AppError> {
        let claims = decode_token(&self.jwt_secret, token, TokenKind::Access)?;
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    /// Cria o admin inicial se ainda não existir (idempotente).
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            tracing::info!("Admin '{}' já existe, bootstrap ignorado.", email);
            return Ok(());
        }

        let password_hash = hash_password(password).await?;
        let admin = self
            .user_repo
            .create_user(&self.pool, email, &password_hash, Role::Admin)
            .await?;
        tracing::info!("👤 Admin inicial criado (id {}).", admin.id);
        Ok(())
    }
}

/// Hash bcrypt fora do runtime assíncrono.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

fn create_token(secret: &str, principal: &Principal, kind: TokenKind, ttl: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + ttl;

    let claims = Claims {
        sub: principal.id,
        role: principal.role,
        kind,
        jti: Uuid::new_v4(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

// Um refresh token nunca passa como access token (e vice-versa)
fn decode_token(secret: &str, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
        .map_err(|_| AppError::InvalidToken)?;

    if token_data.claims.kind != expected {
        return Err(AppError::InvalidToken);
    }
    Ok(token_data.claims)
}
