use uuid::Uuid;

use crate::{
    auth::Role,
    db::dao::{ProfileDao, UserDao},
    db::entities::{admin_profile, doctor_profile, patient_profile, user},
    error::AppError,
};

/// The role-specific half of an identity. Serializes as the bare profile
/// object; the discriminant is the `role` field next to it.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum Profile {
    Patient(patient_profile::Model),
    Doctor(doctor_profile::Model),
    Admin(admin_profile::Model),
}

/// Response shape for a user. Built from the row plus its role profile; the
/// password hash never crosses this boundary.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub profile_complete: bool,
    pub profile: Profile,
}

#[derive(Clone)]
pub struct UserService {
    users: UserDao,
    profiles: ProfileDao,
}

impl UserService {
    pub fn new(users: UserDao, profiles: ProfileDao) -> Self {
        Self { users, profiles }
    }

    /// Joins a user row with its role profile. A missing profile breaks the
    /// registration invariant and is reported as an internal fault, not 404.
    pub async fn identity(&self, user: user::Model) -> Result<UserIdentity, AppError> {
        let role = Role::try_from(user.role.as_str())
            .map_err(|_| AppError::internal("Stored role is not recognized"))?;

        let profile = match role {
            Role::Patient => self
                .profiles
                .find_patient_by_user(&user.id)
                .await?
                .map(Profile::Patient),
            Role::Doctor => self
                .profiles
                .find_doctor_by_user(&user.id)
                .await?
                .map(Profile::Doctor),
            Role::Admin => self
                .profiles
                .find_admin_by_user(&user.id)
                .await?
                .map(Profile::Admin),
        }
        .ok_or_else(|| AppError::internal("Role profile is missing"))?;

        Ok(UserIdentity {
            id: user.id,
            email: user.email,
            role,
            profile_complete: user.profile_complete,
            profile,
        })
    }

    pub async fn find_identity(&self, id: &Uuid) -> Result<Option<UserIdentity>, AppError> {
        match self.users.find_by_id(id).await? {
            Some(user) => Ok(Some(self.identity(user).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<user::Model>, AppError> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.users.find_by_email(email).await?)
    }
}
