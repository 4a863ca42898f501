//src/main.rs

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

#[cfg(test)]
mod integration_tests;

use crate::{
    config::{AppState, Config},
    docs::ApiDoc,
    middleware::auth::auth_layer,
    services::mailer::{run_mail_worker, LogTransport},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG manda; sem ele, "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    // Se a configuração ou o banco falharem, a aplicação não deve iniciar.
    let (app_state, mail_rx) = AppState::new(&config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let Some(admin) = &config.admin {
        app_state.auth_service.ensure_admin(&admin.email, &admin.password).await?;
    }

    // Worker da fila de e-mails (fora do caminho da requisição)
    tokio::spawn(run_mail_worker(
        mail_rx,
        Arc::new(LogTransport),
        config.mail_from.clone(),
        config.mail_retry,
    ));

    let app = build_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(app_state: AppState) -> Router {
    // Públicas
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh));

    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    // Rotas fixas antes de "/{id}"
    let franchise_routes = Router::new()
        .route(
            "/",
            post(handlers::franchise::create_franchise).get(handlers::franchise::list_franchises),
        )
        .route("/options", get(handlers::franchise::list_franchise_options))
        .route("/stats", get(handlers::franchise::franchise_stats))
        .route(
            "/{id}",
            get(handlers::franchise::get_franchise)
                .put(handlers::franchise::update_franchise)
                .delete(handlers::franchise::delete_franchise),
        );

    let staff_routes = Router::new()
        .route("/", post(handlers::staff::create_staff).get(handlers::staff::list_staff))
        .route("/stats", get(handlers::staff::staff_stats))
        .route(
            "/{id}",
            get(handlers::staff::get_staff)
                .put(handlers::staff::update_staff)
                .delete(handlers::staff::delete_staff),
        );

    let student_routes = Router::new()
        .route("/", post(handlers::student::create_student).get(handlers::student::list_students))
        .route("/stats", get(handlers::student::student_stats))
        .route(
            "/{id}",
            get(handlers::student::get_student)
                .put(handlers::student::update_student)
                .delete(handlers::student::delete_student),
        );

    let course_routes = Router::new()
        .route("/", post(handlers::course::create_course).get(handlers::course::list_courses))
        .route("/stats", get(handlers::course::course_stats))
        .route(
            "/{id}",
            get(handlers::course::get_course)
                .put(handlers::course::update_course)
                .delete(handlers::course::delete_course),
        );

    let batch_routes = Router::new()
        .route("/", post(handlers::batch::create_batch).get(handlers::batch::list_batches))
        .route("/stats", get(handlers::batch::batch_stats))
        .route(
            "/{id}",
            get(handlers::batch::get_batch)
                .put(handlers::batch::update_batch)
                .delete(handlers::batch::delete_batch),
        );

    let event_routes = Router::new()
        .route("/", post(handlers::event::create_event).get(handlers::event::list_events))
        .route(
            "/{id}",
            get(handlers::event::get_event)
                .put(handlers::event::update_event)
                .delete(handlers::event::delete_event),
        );

    let attendance_routes = Router::new()
        .route(
            "/",
            get(handlers::attendance::list_attendance).post(handlers::attendance::upsert_attendance),
        )
        .route("/monthly", get(handlers::attendance::monthly_attendance));

    let notification_routes = Router::new()
        .route("/", get(handlers::notifications::list_notifications))
        .route("/unread-count", get(handlers::notifications::unread_count))
        .route("/read-all", post(handlers::notifications::mark_all_notifications_read))
        .route("/{id}/read", post(handlers::notifications::mark_notification_read));

    let dashboard_routes = Router::new().route("/summary", get(handlers::dashboard::get_dashboard_summary));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/franchises", franchise_routes)
        .nest("/api/staff", staff_routes)
        .nest("/api/students", student_routes)
        .nest("/api/courses", course_routes)
        .nest("/api/batches", batch_routes)
        .nest("/api/events", event_routes)
        .nest("/api/attendance", attendance_routes)
        .nest("/api/notifications", notification_routes)
        .nest("/api/dashboard", dashboard_routes)
        // O principal (se houver) é resolvido uma vez para todas as rotas
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_layer))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    // Pool preguiçoso: nenhuma dessas rotas chega a abrir conexão
    fn test_router() -> Router {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/unused".to_string()),
            "JWT_SECRET" => Some("router-test-secret".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
        let (state, _mail_rx) = AppState::from_pool(pool, &config);
        build_router(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = test_router()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn anonymous_reads_degrade_to_empty_lists() {
        let response = test_router()
            .oneshot(Request::get("/api/students").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn anonymous_dashboard_is_all_zeros() {
        let response = test_router()
            .oneshot(Request::get("/api/dashboard/summary").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["students"]["total"], 0);
        assert_eq!(json["unreadNotifications"], 0);
    }

    #[tokio::test]
    async fn anonymous_writes_are_unauthorized() {
        let request = Request::post("/api/courses")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Abacus","duration":"6 months","fees":1000}"#))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_bearer_is_rejected_before_the_handler() {
        let request = Request::get("/api/students")
            .header("authorization", "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = test_router()
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["paths"]["/api/attendance"].is_object());
    }
}
