// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::refresh,

        // --- Users ---
        handlers::auth::get_me,

        // --- Franchises ---
        handlers::franchise::create_franchise,
        handlers::franchise::list_franchises,
        handlers::franchise::list_franchise_options,
        handlers::franchise::franchise_stats,
        handlers::franchise::get_franchise,
        handlers::franchise::update_franchise,
        handlers::franchise::delete_franchise,

        // --- Staff ---
        handlers::staff::create_staff,
        handlers::staff::list_staff,
        handlers::staff::staff_stats,
        handlers::staff::get_staff,
        handlers::staff::update_staff,
        handlers::staff::delete_staff,

        // --- Students ---
        handlers::student::create_student,
        handlers::student::list_students,
        handlers::student::student_stats,
        handlers::student::get_student,
        handlers::student::update_student,
        handlers::student::delete_student,

        // --- Courses ---
        handlers::course::create_course,
        handlers::course::list_courses,
        handlers::course::course_stats,
        handlers::course::get_course,
        handlers::course::update_course,
        handlers::course::delete_course,

        // --- Batches ---
        handlers::batch::create_batch,
        handlers::batch::list_batches,
        handlers::batch::batch_stats,
        handlers::batch::get_batch,
        handlers::batch::update_batch,
        handlers::batch::delete_batch,

        // --- Events ---
        handlers::event::create_event,
        handlers::event::list_events,
        handlers::event::get_event,
        handlers::event::update_event,
        handlers::event::delete_event,

        // --- Attendance ---
        handlers::attendance::list_attendance,
        handlers::attendance::upsert_attendance,
        handlers::attendance::monthly_attendance,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_notification_read,
        handlers::notifications::mark_all_notifications_read,
        handlers::notifications::unread_count,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Principal,
            models::auth::LoginPayload,
            models::auth::RefreshPayload,
            models::auth::AccountCredentials,
            models::auth::TokenPair,
            models::auth::LoginResponse,
            models::auth::MeResponse,
            models::scope::Scope,

            // --- Status ---
            models::status::RecordStatus,
            models::status::FranchiseStatus,
            models::status::EventStatus,

            // --- Franchises ---
            models::franchise::Franchise,
            models::franchise::FranchiseOption,
            models::franchise::CreateFranchisePayload,
            models::franchise::UpdateFranchisePayload,

            // --- Staff ---
            models::staff::StaffRole,
            models::staff::Staff,
            models::staff::StaffView,
            models::staff::CreateStaffPayload,
            models::staff::UpdateStaffPayload,

            // --- Students ---
            models::student::Student,
            models::student::StudentView,
            models::student::CreateStudentPayload,
            models::student::UpdateStudentPayload,

            // --- Courses / Batches / Events ---
            models::course::Course,
            models::course::CreateCoursePayload,
            models::course::UpdateCoursePayload,
            models::batch::Batch,
            models::batch::CreateBatchPayload,
            models::batch::UpdateBatchPayload,
            models::event::Event,
            models::event::CreateEventPayload,
            models::event::UpdateEventPayload,

            // --- Attendance ---
            models::attendance::PersonType,
            models::attendance::AttendanceStatus,
            models::attendance::AttendanceRecord,
            models::attendance::AttendanceView,
            models::attendance::AttendanceInput,
            models::attendance::AttendanceSubmission,

            // --- Notifications / Dashboard ---
            models::notification::Notification,
            models::notification::UnreadCount,
            models::dashboard::EntityStats,
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Login e renovação de tokens"),
        (name = "Users", description = "Dados do principal e escopo resolvido"),
        (name = "Franchises", description = "Gestão de Franquias"),
        (name = "Staff", description = "Equipe das franquias"),
        (name = "Students", description = "Alunos"),
        (name = "Courses", description = "Catálogo de Cursos"),
        (name = "Batches", description = "Turmas"),
        (name = "Events", description = "Eventos"),
        (name = "Attendance", description = "Presença de staff e alunos"),
        (name = "Notifications", description = "Notificações"),
        (name = "Dashboard", description = "Indicadores Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
