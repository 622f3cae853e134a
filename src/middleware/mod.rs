pub mod guards;
pub mod json_error;

pub use guards::{AuthUser, RoleGuard};
pub use json_error::json_error_middleware;
