use sea_orm::DatabaseConnection;

pub mod appointment_dao;
pub mod error;
pub mod history_dao;
pub mod prescription_dao;
pub mod profile_dao;
pub mod user_dao;

pub use appointment_dao::{AppointmentDao, NewAppointment};
pub use error::{DaoLayerError, DaoResult};
pub use history_dao::HistoryDao;
pub use prescription_dao::{NewMedicationLine, NewPrescription, PrescriptionDao};
pub use profile_dao::{DoctorProfileUpdate, PatientProfileUpdate, ProfileDao};
pub use user_dao::UserDao;

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        UserDao::new(&self.db)
    }

    pub fn profile(&self) -> ProfileDao {
        ProfileDao::new(&self.db)
    }

    pub fn appointment(&self) -> AppointmentDao {
        AppointmentDao::new(&self.db)
    }

    pub fn prescription(&self) -> PrescriptionDao {
        PrescriptionDao::new(&self.db)
    }

    pub fn history(&self) -> HistoryDao {
        HistoryDao::new(&self.db)
    }
}
