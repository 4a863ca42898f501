// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{map_write_error, unique_message},
        error::AppError,
    },
    models::auth::{Principal, Role},
};

// O repositório de principals, responsável pelas interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um principal pelo e-mail (login)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, AppError> {
        let principal = sqlx::query_as::<_, Principal>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    // Busca um principal pelo ID (validação do token)
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Principal>, AppError> {
        let principal = sqlx::query_as::<_, Principal>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    // Cria um novo principal. Roda dentro da transação de quem chama
    // (franquia + franchise_head, staff + principal).
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Principal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Principal>(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, unique_message))
    }

    // Remove o principal. Devolve `false` se ele já não existia.
    pub async fn delete_user<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
