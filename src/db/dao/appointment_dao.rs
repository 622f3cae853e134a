use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::DaoResult;
use crate::db::entities::{appointment, prelude::Appointment};

#[derive(Debug)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<FixedOffset>,
    pub appointment_type: String,
    pub status: Option<String>,
}

#[derive(Clone)]
pub struct AppointmentDao {
    db: DatabaseConnection,
}

impl AppointmentDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn create(&self, new: NewAppointment) -> DaoResult<appointment::Model> {
        let model = appointment::ActiveModel {
            id: Set(Uuid::new_v4()),
            patient_id: Set(new.patient_id),
            doctor_id: Set(new.doctor_id),
            appointment_date: Set(new.appointment_date),
            appointment_type: Set(new.appointment_type),
            status: Set(new.status.unwrap_or_else(|| "SCHEDULED".to_string())),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn find_by_id(&self, id: &Uuid) -> DaoResult<Option<appointment::Model>> {
        Ok(Appointment::find_by_id(*id).one(&self.db).await?)
    }

    pub async fn for_patient(&self, patient_id: &Uuid) -> DaoResult<Vec<appointment::Model>> {
        Ok(Appointment::find()
            .filter(appointment::Column::PatientId.eq(*patient_id))
            .order_by_desc(appointment::Column::AppointmentDate)
            .all(&self.db)
            .await?)
    }

    pub async fn for_doctor(&self, doctor_id: &Uuid) -> DaoResult<Vec<appointment::Model>> {
        Ok(Appointment::find()
            .filter(appointment::Column::DoctorId.eq(*doctor_id))
            .order_by_desc(appointment::Column::AppointmentDate)
            .all(&self.db)
            .await?)
    }

    pub async fn count(&self) -> DaoResult<u64> {
        Ok(Appointment::find().count(&self.db).await?)
    }

    pub async fn count_by_status(&self, status: &str) -> DaoResult<u64> {
        Ok(Appointment::find()
            .filter(appointment::Column::Status.eq(status))
            .count(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{AppointmentDao, NewAppointment};
    use crate::db::dao::user_dao::tests::ts;
    use crate::db::entities::appointment;

    fn appointment_model(patient_id: Uuid, doctor_id: Uuid) -> appointment::Model {
        appointment::Model {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            appointment_date: ts(),
            appointment_type: "CONSULTATION".to_string(),
            status: "SCHEDULED".to_string(),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[tokio::test]
    async fn create_starts_appointments_as_scheduled() {
        let patient_id = Uuid::new_v4();
        let doctor_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[appointment_model(patient_id, doctor_id)]])
            .into_connection();
        let dao = AppointmentDao::new(&db);

        let created = dao
            .create(NewAppointment {
                patient_id,
                doctor_id,
                appointment_date: ts(),
                appointment_type: "CONSULTATION".to_string(),
                status: None,
            })
            .await
            .expect("create should succeed");
        assert_eq!(created.status, "SCHEDULED");
        assert_eq!(created.patient_id, patient_id);
    }

    #[tokio::test]
    async fn for_patient_returns_all_rows() {
        let patient_id = Uuid::new_v4();
        let doctor_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                appointment_model(patient_id, doctor_id),
                appointment_model(patient_id, doctor_id),
            ]])
            .into_connection();
        let dao = AppointmentDao::new(&db);

        let rows = dao
            .for_patient(&patient_id)
            .await
            .expect("query should succeed");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|a| a.patient_id == patient_id));
    }
}
