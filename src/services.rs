pub mod attendance_service;
pub mod auth;
pub mod batch_service;
pub mod course_service;
pub mod dashboard_service;
pub mod deletion;
pub mod event_service;
pub mod franchise_service;
pub mod mailer;
pub mod notification_service;
pub mod scope_service;
pub mod staff_service;
pub mod student_service;
