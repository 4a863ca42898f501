pub mod scope_filter;

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod franchise_repo;
pub use franchise_repo::FranchiseRepository;
pub mod staff_repo;
pub use staff_repo::StaffRepository;
pub mod student_repo;
pub use student_repo::StudentRepository;
pub mod course_repo;
pub use course_repo::CourseRepository;
pub mod batch_repo;
pub use batch_repo::BatchRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod attendance_repo;
pub use attendance_repo::AttendanceRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
