use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::DaoResult;
use crate::db::entities::{medical_history, prelude::MedicalHistory};

#[derive(Clone)]
pub struct HistoryDao {
    db: DatabaseConnection,
}

impl HistoryDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    /// Newest entries first, across all treating doctors.
    pub async fn for_patient(&self, patient_id: &Uuid) -> DaoResult<Vec<medical_history::Model>> {
        Ok(MedicalHistory::find()
            .filter(medical_history::Column::PatientId.eq(*patient_id))
            .order_by_desc(medical_history::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn for_patient_and_doctor(
        &self,
        patient_id: &Uuid,
        doctor_id: &Uuid,
    ) -> DaoResult<Vec<medical_history::Model>> {
        Ok(MedicalHistory::find()
            .filter(medical_history::Column::PatientId.eq(*patient_id))
            .filter(medical_history::Column::DoctorId.eq(*doctor_id))
            .order_by_desc(medical_history::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::HistoryDao;
    use crate::db::dao::user_dao::tests::ts;
    use crate::db::entities::medical_history;

    fn history_model(patient_id: Uuid, doctor_id: Uuid, condition: &str) -> medical_history::Model {
        medical_history::Model {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            condition: condition.to_string(),
            notes: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[tokio::test]
    async fn for_patient_returns_all_entries() {
        let patient_id = Uuid::new_v4();
        let doctor_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                history_model(patient_id, doctor_id, "Hypertension"),
                history_model(patient_id, doctor_id, "Asthma"),
            ]])
            .into_connection();
        let dao = HistoryDao::new(&db);

        let rows = dao
            .for_patient(&patient_id)
            .await
            .expect("query should succeed");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|h| h.patient_id == patient_id));
    }
}
