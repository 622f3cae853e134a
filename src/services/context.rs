use sea_orm::DatabaseConnection;

use crate::{
    auth::{PasswordHasher, TokenService},
    db::dao::DaoContext,
    services::{
        admin_service::AdminService, appointment_service::AppointmentService,
        auth_service::AuthService, prescription_service::PrescriptionService,
        record_service::RecordService, user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user(), self.daos.profile())
    }

    pub fn auth<'a>(
        &self,
        tokens: &'a TokenService,
        hasher: &'a PasswordHasher,
    ) -> AuthService<'a> {
        AuthService::new(self.user(), self.daos.user(), tokens, hasher)
    }

    pub fn appointment(&self) -> AppointmentService {
        AppointmentService::new(self.daos.appointment(), self.daos.profile())
    }

    pub fn prescription(&self) -> PrescriptionService {
        PrescriptionService::new(
            self.daos.prescription(),
            self.daos.appointment(),
            self.daos.profile(),
        )
    }

    pub fn record(&self) -> RecordService {
        RecordService::new(
            self.daos.history(),
            self.daos.appointment(),
            self.daos.prescription(),
            self.daos.profile(),
        )
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(
            self.user(),
            self.daos.user(),
            self.daos.profile(),
            self.daos.appointment(),
        )
    }
}
