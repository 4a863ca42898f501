// src/config.rs

use std::{str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    db::{
        AttendanceRepository, BatchRepository, CourseRepository, EventRepository, FranchiseRepository,
        NotificationRepository, StaffRepository, StudentRepository, UserRepository,
    },
    services::{
        attendance_service::AttendanceService,
        auth::AuthService,
        batch_service::BatchService,
        course_service::CourseService,
        dashboard_service::DashboardService,
        event_service::EventService,
        franchise_service::FranchiseService,
        mailer::{Mailer, RetryPolicy, WelcomeEmail},
        notification_service::NotificationService,
        scope_service::ScopeService,
        staff_service::StaffService,
        student_service::StudentService,
    },
};

// ---
// Configuração (variáveis de ambiente / .env)
// ---

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
    pub mail_from: String,
    pub mail_retry: RetryPolicy,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Lê a configuração de qualquer fonte chave -> valor.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} deve ser definida", key))
        };

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(AdminBootstrap { email, password })
            }
            _ => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            access_token_ttl: chrono::Duration::minutes(parse_or(&lookup, "ACCESS_TOKEN_TTL_MINUTES", 60)?),
            refresh_token_ttl: chrono::Duration::days(parse_or(&lookup, "REFRESH_TOKEN_TTL_DAYS", 7)?),
            mail_from: lookup("MAIL_FROM").unwrap_or_else(|| "no-reply@franchise.local".to_string()),
            mail_retry: RetryPolicy {
                max_attempts: parse_or(&lookup, "MAIL_MAX_ATTEMPTS", 5)?,
                base_delay: Duration::from_millis(parse_or(&lookup, "MAIL_RETRY_BASE_MS", 500)?),
            },
            admin,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{} inválida: '{}'", key, raw)),
        None => Ok(default),
    }
}

// ---
// Estado compartilhado
// ---

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub scope_service: ScopeService,
    pub franchise_service: FranchiseService,
    pub staff_service: StaffService,
    pub student_service: StudentService,
    pub course_service: CourseService,
    pub batch_service: BatchService,
    pub event_service: EventService,
    pub attendance_service: AttendanceService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Conecta ao banco e monta o estado. Devolve também a ponta de leitura
    /// da fila de e-mails, consumida pelo worker iniciado no `main`.
    pub async fn new(config: &Config) -> anyhow::Result<(Self, UnboundedReceiver<WelcomeEmail>)> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: &Config) -> (Self, UnboundedReceiver<WelcomeEmail>) {
        let user_repo = UserRepository::new(db_pool.clone());
        let franchise_repo = FranchiseRepository::new();
        let staff_repo = StaffRepository::new();
        let student_repo = StudentRepository::new();
        let course_repo = CourseRepository::new();
        let batch_repo = BatchRepository::new();
        let event_repo = EventRepository::new();
        let attendance_repo = AttendanceRepository::new();
        let notification_repo = NotificationRepository::new();

        let (mailer, mail_rx) = Mailer::new();
        let notification_service = NotificationService::new(notification_repo.clone(), db_pool.clone());

        let state = Self {
            auth_service: AuthService::new(
                user_repo.clone(),
                db_pool.clone(),
                config.jwt_secret.clone(),
                config.access_token_ttl,
                config.refresh_token_ttl,
            ),
            scope_service: ScopeService::new(db_pool.clone(), franchise_repo.clone(), staff_repo.clone()),
            franchise_service: FranchiseService::new(
                db_pool.clone(),
                franchise_repo.clone(),
                user_repo.clone(),
                notification_service.clone(),
                mailer.clone(),
            ),
            staff_service: StaffService::new(
                db_pool.clone(),
                staff_repo.clone(),
                user_repo,
                franchise_repo.clone(),
                notification_service.clone(),
                mailer,
            ),
            student_service: StudentService::new(db_pool.clone(), student_repo.clone(), franchise_repo.clone()),
            course_service: CourseService::new(db_pool.clone(), course_repo.clone(), franchise_repo.clone()),
            batch_service: BatchService::new(db_pool.clone(), batch_repo.clone(), franchise_repo.clone()),
            event_service: EventService::new(
                db_pool.clone(),
                event_repo,
                franchise_repo.clone(),
                notification_service.clone(),
            ),
            attendance_service: AttendanceService::new(db_pool.clone(), attendance_repo, franchise_repo.clone()),
            dashboard_service: DashboardService::new(
                db_pool.clone(),
                franchise_repo,
                staff_repo,
                student_repo,
                course_repo,
                batch_repo,
                notification_repo,
            ),
            notification_service,
            db_pool,
        };

        (state, mail_rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/franchise"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_acquire_timeout, Duration::from_secs(3));
        assert_eq!(config.access_token_ttl, chrono::Duration::minutes(60));
        assert_eq!(config.refresh_token_ttl, chrono::Duration::days(7));
        assert_eq!(config.mail_retry.max_attempts, 5);
        assert_eq!(config.mail_retry.base_delay, Duration::from_millis(500));
        assert!(config.admin.is_none());
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = config_from(&[("DATABASE_URL", "postgres://localhost/franchise")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn malformed_numbers_are_reported_with_their_key() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://localhost/franchise"),
            ("JWT_SECRET", "s3cret"),
            ("DB_MAX_CONNECTIONS", "many"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn admin_bootstrap_needs_both_email_and_password() {
        let base = [("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "s")];
        let only_email = config_from(&[base[0], base[1], ("ADMIN_EMAIL", "root@franchise.com")]).unwrap();
        assert!(only_email.admin.is_none());

        let both = config_from(&[base[0], base[1], ("ADMIN_EMAIL", "root@franchise.com"), ("ADMIN_PASSWORD", "changeme")])
            .unwrap();
        assert_eq!(both.admin.unwrap().email, "root@franchise.com");
    }

    #[test]
    fn scoped_repositories_hold_no_connection() {
        // Só o repositório de usuários guarda o pool
        assert_eq!(std::mem::size_of::<FranchiseRepository>(), 0);
        assert_eq!(std::mem::size_of::<StaffRepository>(), 0);
        assert_eq!(std::mem::size_of::<StudentRepository>(), 0);
        assert_eq!(std::mem::size_of::<CourseRepository>(), 0);
        assert_eq!(std::mem::size_of::<BatchRepository>(), 0);
        assert_eq!(std::mem::size_of::<EventRepository>(), 0);
        assert_eq!(std::mem::size_of::<AttendanceRepository>(), 0);
        assert_eq!(std::mem::size_of::<NotificationRepository>(), 0);
    }
}
