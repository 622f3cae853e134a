use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "PATIENT",
            Role::Doctor => "DOCTOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PATIENT" => Ok(Role::Patient),
            "DOCTOR" => Ok(Role::Doctor),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

pub trait RequiredRole {
    fn required() -> Role;
}

pub struct PatientRole;

impl RequiredRole for PatientRole {
    fn required() -> Role {
        Role::Patient
    }
}

pub struct DoctorRole;

impl RequiredRole for DoctorRole {
    fn required() -> Role {
        Role::Doctor
    }
}

pub struct AdminRole;

impl RequiredRole for AdminRole {
    fn required() -> Role {
        Role::Admin
    }
}

/// Signed token payload. Roles are deliberately absent: the request gate
/// re-reads the identity from the store on every request, so a role change
/// takes effect without waiting for token expiry.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,  // expiry (unix)
    pub iat: usize,  // issued at
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}

#[cfg(test)]
mod tests {
    use super::{AdminRole, DoctorRole, PatientRole, RequiredRole, Role};

    #[test]
    fn role_string_roundtrip() {
        assert_eq!(Role::Patient.as_str(), "PATIENT");
        assert_eq!(Role::Doctor.as_str(), "DOCTOR");
        assert_eq!(Role::Admin.as_str(), "ADMIN");

        assert_eq!(Role::try_from("PATIENT"), Ok(Role::Patient));
        assert_eq!(Role::try_from("DOCTOR"), Ok(Role::Doctor));
        assert_eq!(Role::try_from("ADMIN"), Ok(Role::Admin));
        assert!(Role::try_from("patient").is_err());
        assert!(Role::try_from("NURSE").is_err());
    }

    #[test]
    fn required_role_markers_map_to_expected_role() {
        assert_eq!(PatientRole::required(), Role::Patient);
        assert_eq!(DoctorRole::required(), Role::Doctor);
        assert_eq!(AdminRole::required(), Role::Admin);
    }
}
