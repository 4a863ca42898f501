pub mod attendance;
pub mod auth;
pub mod batch;
pub mod course;
pub mod dashboard;
pub mod event;
pub mod franchise;
pub mod notifications;
pub mod staff;
pub mod student;
