pub mod jwt;
pub mod password;
pub mod seed;
mod types;

pub use jwt::{TokenError, TokenService};
pub use password::PasswordHasher;
pub use types::{AdminRole, Claims, DoctorRole, PatientRole, RequiredRole, Role, TokenPair};
