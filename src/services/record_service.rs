use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::{
    db::dao::{AppointmentDao, HistoryDao, PrescriptionDao, ProfileDao},
    db::entities::{appointment, medical_history, medication_line, patient_profile},
    error::AppError,
    services::prescription_service::PrescriptionView,
};

/// History entry with the treating doctor's display name attached.
#[derive(Debug, serde::Serialize)]
pub struct HistoryView {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub condition: String,
    pub notes: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
}

/// Everything one doctor holds on one patient.
#[derive(Debug, serde::Serialize)]
pub struct PatientRecord {
    pub patient: patient_profile::Model,
    pub appointments: Vec<appointment::Model>,
    pub prescriptions: Vec<PrescriptionView>,
    pub history: Vec<medical_history::Model>,
}

#[derive(Clone)]
pub struct RecordService {
    histories: HistoryDao,
    appointments: AppointmentDao,
    prescriptions: PrescriptionDao,
    profiles: ProfileDao,
}

impl RecordService {
    pub fn new(
        histories: HistoryDao,
        appointments: AppointmentDao,
        prescriptions: PrescriptionDao,
        profiles: ProfileDao,
    ) -> Self {
        Self {
            histories,
            appointments,
            prescriptions,
            profiles,
        }
    }

    /// The patient's full history, newest first, with doctor names resolved
    /// in one batched lookup.
    pub async fn history_for_patient(
        &self,
        patient_id: &Uuid,
    ) -> Result<Vec<HistoryView>, AppError> {
        let entries = self.histories.for_patient(patient_id).await?;

        let mut doctor_ids: Vec<Uuid> = entries.iter().map(|h| h.doctor_id).collect();
        doctor_ids.sort_unstable();
        doctor_ids.dedup();
        let doctors: HashMap<Uuid, String> = self
            .profiles
            .find_doctors_by_ids(&doctor_ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| HistoryView {
                id: entry.id,
                patient_id: entry.patient_id,
                doctor_name: doctors.get(&entry.doctor_id).cloned(),
                doctor_id: entry.doctor_id,
                condition: entry.condition,
                notes: entry.notes,
                created_at: entry.created_at,
            })
            .collect())
    }

    /// Assembles the record one doctor may see: the profile itself plus the
    /// appointments, prescriptions, and history entries shared with that
    /// doctor. Other doctors' clinical data stays out.
    pub async fn patient_record(
        &self,
        doctor_id: &Uuid,
        patient_id: &Uuid,
    ) -> Result<PatientRecord, AppError> {
        let patient = self
            .profiles
            .find_patient(patient_id)
            .await?
            .ok_or_else(|| AppError::not_found("Patient record not found"))?;

        let appointments: Vec<appointment::Model> = self
            .appointments
            .for_patient(patient_id)
            .await?
            .into_iter()
            .filter(|a| a.doctor_id == *doctor_id)
            .collect();

        let headers: Vec<_> = self
            .prescriptions
            .for_patient(patient_id)
            .await?
            .into_iter()
            .filter(|p| p.doctor_id == *doctor_id)
            .collect();
        let ids: Vec<Uuid> = headers.iter().map(|p| p.id).collect();
        let mut lines_by_prescription: HashMap<Uuid, Vec<medication_line::Model>> = HashMap::new();
        for line in self.prescriptions.lines_for_many(&ids).await? {
            lines_by_prescription
                .entry(line.prescription_id)
                .or_default()
                .push(line);
        }
        let prescriptions = headers
            .into_iter()
            .map(|header| {
                let lines = lines_by_prescription.remove(&header.id).unwrap_or_default();
                PrescriptionView::assemble(header, lines, Some(patient.name.clone()))
            })
            .collect();

        let history = self
            .histories
            .for_patient_and_doctor(patient_id, doctor_id)
            .await?;

        Ok(PatientRecord {
            patient,
            appointments,
            prescriptions,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::RecordService;
    use crate::db::dao::user_dao::tests::ts;
    use crate::db::dao::{AppointmentDao, HistoryDao, PrescriptionDao, ProfileDao};
    use crate::db::entities::{
        appointment, doctor_profile, medical_history, medication_line, patient_profile,
        prescription,
    };

    fn service(db: &sea_orm::DatabaseConnection) -> RecordService {
        RecordService::new(
            HistoryDao::new(db),
            AppointmentDao::new(db),
            PrescriptionDao::new(db),
            ProfileDao::new(db),
        )
    }

    fn patient_model(id: Uuid) -> patient_profile::Model {
        patient_profile::Model {
            id,
            user_id: Uuid::new_v4(),
            name: "Alice".to_string(),
            phone: String::new(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 6, 15)
                .expect("date should be valid"),
            gender: "FEMALE".to_string(),
            blood_group: "A_POSITIVE".to_string(),
            emergency_contact: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn doctor_model(id: Uuid, name: &str) -> doctor_profile::Model {
        doctor_profile::Model {
            id,
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            phone: "555-0100".to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1980, 3, 1)
                .expect("date should be valid"),
            specialization: None,
            license_number: "LIC-1".to_string(),
            consultation_fee: 150,
            experience_years: 12,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn appointment_model(patient_id: Uuid, doctor_id: Uuid) -> appointment::Model {
        appointment::Model {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            appointment_date: ts(),
            appointment_type: "CONSULTATION".to_string(),
            status: "COMPLETED".to_string(),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn prescription_model(id: Uuid, doctor_id: Uuid, patient_id: Uuid) -> prescription::Model {
        prescription::Model {
            id,
            appointment_id: Uuid::new_v4(),
            doctor_id,
            patient_id,
            prescription_date: ts(),
            diagnosis: "Seasonal flu".to_string(),
            description: "Rest and fluids".to_string(),
            created_at: ts(),
            updated_at: ts(),
        }
    }

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

    fn line_model(prescription_id: Uuid) -> medication_line::Model {
        medication_line::Model {
            id: Uuid::new_v4(),
            prescription_id,
            medication_name: "Paracetamol".to_string(),
            dosage: "500mg".to_string(),
            frequency: "TWICE_DAILY".to_string(),
            duration: "5 days".to_string(),
            created_at: ts(),
        }
    }

    #[tokio::test]
    async fn history_attaches_doctor_names() {
        let patient_id = Uuid::new_v4();
        let doctor_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                history_model(patient_id, doctor_id, "Hypertension"),
                history_model(patient_id, doctor_id, "Asthma"),
            ]])
            .append_query_results([[doctor_model(doctor_id, "Dr. Chen")]])
            .into_connection();

        let views = service(&db)
            .history_for_patient(&patient_id)
            .await
            .expect("history should load");
        assert_eq!(views.len(), 2);
        assert!(views
            .iter()
            .all(|v| v.doctor_name.as_deref() == Some("Dr. Chen")));
    }

    #[tokio::test]
    async fn record_keeps_only_the_requesting_doctors_data() {
        let patient_id = Uuid::new_v4();
        let doctor_id = Uuid::new_v4();
        let other_doctor = Uuid::new_v4();
        let mine = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[patient_model(patient_id)]])
            .append_query_results([vec![
                appointment_model(patient_id, doctor_id),
                appointment_model(patient_id, other_doctor),
            ]])
            .append_query_results([vec![
                prescription_model(mine, doctor_id, patient_id),
                prescription_model(Uuid::new_v4(), other_doctor, patient_id),
            ]])
            .append_query_results([[line_model(mine)]])
            .append_query_results([[history_model(patient_id, doctor_id, "Hypertension")]])
            .into_connection();

        let record = service(&db)
            .patient_record(&doctor_id, &patient_id)
            .await
            .expect("record should load");
        assert_eq!(record.appointments.len(), 1);
        assert_eq!(record.prescriptions.len(), 1);
        assert_eq!(record.prescriptions[0].medications.len(), 1);
        assert_eq!(record.history.len(), 1);
        assert_eq!(record.patient.name, "Alice");
    }

    #[tokio::test]
    async fn record_for_an_unknown_patient_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<patient_profile::Model>::new()])
            .into_connection();

        let err = service(&db)
            .patient_record(&Uuid::new_v4(), &Uuid::new_v4())
            .await
            .expect_err("record should fail");
        assert_eq!(err.code(), "not_found");
    }
}
