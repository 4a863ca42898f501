pub mod attendance;
pub mod auth;
pub mod batch;
pub mod course;
pub mod dashboard;
pub mod event;
pub mod franchise;
pub mod notification;
pub mod scope;
pub mod staff;
pub mod status;
pub mod student;
