use uuid::Uuid;

use crate::{
    auth::Role,
    db::dao::{AppointmentDao, ProfileDao, UserDao},
    error::AppError,
    services::user_service::{UserIdentity, UserService},
};

#[derive(Debug, serde::Serialize)]
pub struct AppointmentTotals {
    pub pending: u64,
    pub scheduled: u64,
    pub completed: u64,
    pub cancelled: u64,
}

#[derive(Debug, serde::Serialize)]
pub struct AnalyticsSummary {
    pub total_users: u64,
    pub total_patients: u64,
    pub total_doctors: u64,
    pub total_appointments: u64,
    pub appointments_by_status: AppointmentTotals,
}

pub struct AdminService {
    identities: UserService,
    users: UserDao,
    profiles: ProfileDao,
    appointments: AppointmentDao,
}

impl AdminService {
    pub fn new(
        identities: UserService,
        users: UserDao,
        profiles: ProfileDao,
        appointments: AppointmentDao,
    ) -> Self {
        Self {
            identities,
            users,
            profiles,
            appointments,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserIdentity>, AppError> {
        let mut identities = Vec::new();
        for user in self.users.find_all().await? {
            identities.push(self.identities.identity(user).await?);
        }
        Ok(identities)
    }

    /// Changes a user's role, backfilling a placeholder profile for the new
    /// role when the user never held it before.
    pub async fn update_role(&self, id: &Uuid, role: &str) -> Result<UserIdentity, AppError> {
        let role = Role::try_from(role).map_err(|_| AppError::invalid_role(role))?;
        let updated = self.users.update_role(id, role).await?;
        self.identities.identity(updated).await
    }

    /// Profiles cascade with the user row.
    pub async fn delete_user(&self, id: &Uuid) -> Result<(), AppError> {
        Ok(self.users.delete(id).await?)
    }

    pub async fn analytics(&self) -> Result<AnalyticsSummary, AppError> {
        Ok(AnalyticsSummary {
            total_users: self.users.count().await?,
            total_patients: self.profiles.count_patients().await?,
            total_doctors: self.profiles.count_doctors().await?,
            total_appointments: self.appointments.count().await?,
            appointments_by_status: AppointmentTotals {
                pending: self.appointments.count_by_status("PENDING").await?,
                scheduled: self.appointments.count_by_status("SCHEDULED").await?,
                completed: self.appointments.count_by_status("COMPLETED").await?,
                cancelled: self.appointments.count_by_status("CANCELLED").await?,
            },
        })
    }
}
