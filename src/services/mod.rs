pub mod admin_service;
pub mod appointment_service;
pub mod auth_service;
pub mod context;
pub mod prescription_service;
pub mod record_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use appointment_service::AppointmentService;
pub use auth_service::AuthService;
pub use context::ServiceContext;
pub use prescription_service::PrescriptionService;
pub use record_service::RecordService;
pub use user_service::{Profile, UserIdentity, UserService};
