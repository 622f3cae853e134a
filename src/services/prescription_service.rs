use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

use crate::{
    db::dao::{
        AppointmentDao, DaoLayerError, NewMedicationLine, NewPrescription, PrescriptionDao,
        ProfileDao,
    },
    db::entities::{medication_line, prescription},
    error::AppError,
};

/// Clients may send `patient_id` alongside the appointment; the appointment
/// stays authoritative and a mismatch is rejected.
#[derive(Debug, serde::Deserialize)]
pub struct WritePrescription {
    pub appointment_id: Uuid,
    #[serde(default)]
    pub patient_id: Option<Uuid>,
    pub diagnosis: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prescription_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub medications: Vec<NewMedicationLine>,
}

#[derive(Debug, serde::Serialize)]
pub struct PrescriptionView {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub prescription_date: DateTime<FixedOffset>,
    pub diagnosis: String,
    pub description: String,
    pub medications: Vec<medication_line::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

impl PrescriptionView {
    pub(crate) fn assemble(
        model: prescription::Model,
        medications: Vec<medication_line::Model>,
        patient_name: Option<String>,
    ) -> Self {
        Self {
            id: model.id,
            appointment_id: model.appointment_id,
            doctor_id: model.doctor_id,
            patient_id: model.patient_id,
            prescription_date: model.prescription_date,
            diagnosis: model.diagnosis,
            description: model.description,
            medications,
            patient_name,
        }
    }
}

#[derive(Clone)]
pub struct PrescriptionService {
    prescriptions: PrescriptionDao,
    appointments: AppointmentDao,
    profiles: ProfileDao,
}

impl PrescriptionService {
    pub fn new(
        prescriptions: PrescriptionDao,
        appointments: AppointmentDao,
        profiles: ProfileDao,
    ) -> Self {
        Self {
            prescriptions,
            appointments,
            profiles,
        }
    }

    /// Validates against the appointment, then writes the prescription and
    /// all medication lines as one unit. An empty medication list is valid.
    pub async fn create(
        &self,
        doctor_id: &Uuid,
        req: WritePrescription,
    ) -> Result<PrescriptionView, AppError> {
        if req.diagnosis.trim().is_empty() {
            return Err(AppError::validation("Diagnosis is required"));
        }
        for line in &req.medications {
            if line.medication_name.trim().is_empty() {
                return Err(AppError::validation("Medication name is required"));
            }
        }

        let appointment = self
            .appointments
            .find_by_id(&req.appointment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment not found"))?;
        if appointment.doctor_id != *doctor_id {
            return Err(AppError::forbidden(
                "Appointment belongs to a different doctor",
            ));
        }
        if let Some(patient_id) = req.patient_id
            && patient_id != appointment.patient_id
        {
            return Err(AppError::validation(
                "Patient does not match the appointment",
            ));
        }

        let (header, lines) = self
            .prescriptions
            .create_with_medications(
                NewPrescription {
                    appointment_id: appointment.id,
                    doctor_id: *doctor_id,
                    patient_id: appointment.patient_id,
                    prescription_date: req
                        .prescription_date
                        .unwrap_or_else(|| Utc::now().fixed_offset()),
                    diagnosis: req.diagnosis,
                    description: req.description,
                },
                req.medications,
            )
            .await
            .map_err(write_failure)?;

        let patient_name = self
            .profiles
            .find_patient(&header.patient_id)
            .await?
            .map(|p| p.name);
        Ok(PrescriptionView::assemble(header, lines, patient_name))
    }

    pub async fn list_for_doctor(
        &self,
        doctor_id: &Uuid,
    ) -> Result<Vec<PrescriptionView>, AppError> {
        let headers = self.prescriptions.for_doctor(doctor_id).await?;
        self.assemble_views(headers).await
    }

    pub async fn list_for_patient(
        &self,
        patient_id: &Uuid,
    ) -> Result<Vec<PrescriptionView>, AppError> {
        let headers = self.prescriptions.for_patient(patient_id).await?;
        self.assemble_views(headers).await
    }

    async fn assemble_views(
        &self,
        headers: Vec<prescription::Model>,
    ) -> Result<Vec<PrescriptionView>, AppError> {
        let ids: Vec<Uuid> = headers.iter().map(|p| p.id).collect();
        let mut lines_by_prescription: HashMap<Uuid, Vec<medication_line::Model>> = HashMap::new();
        for line in self.prescriptions.lines_for_many(&ids).await? {
            lines_by_prescription
                .entry(line.prescription_id)
                .or_default()
                .push(line);
        }

        let mut patient_ids: Vec<Uuid> = headers.iter().map(|p| p.patient_id).collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();
        let patients: HashMap<Uuid, String> = self
            .profiles
            .find_patients_by_ids(&patient_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(headers
            .into_iter()
            .map(|header| {
                let lines = lines_by_prescription.remove(&header.id).unwrap_or_default();
                let patient_name = patients.get(&header.patient_id).cloned();
                PrescriptionView::assemble(header, lines, patient_name)
            })
            .collect())
    }
}

/// The whole unit rolled back, whatever the underlying cause; report it as
/// one failure instead of reusing per-entity mappings.
fn write_failure(err: DaoLayerError) -> AppError {
    if let DaoLayerError::Db(db_err) = &err {
        tracing::error!(error = %db_err, "prescription write rolled back");
    }
    AppError::transaction_failed("Prescription could not be saved")
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{PrescriptionService, WritePrescription, write_failure};
    use crate::db::dao::{
        AppointmentDao, DaoLayerError, NewMedicationLine, PrescriptionDao, ProfileDao,
    };
    use crate::db::dao::user_dao::tests::ts;
    use crate::db::entities::{appointment, medication_line, patient_profile, prescription};

    fn service(db: &sea_orm::DatabaseConnection) -> PrescriptionService {
        PrescriptionService::new(
            PrescriptionDao::new(db),
            AppointmentDao::new(db),
            ProfileDao::new(db),
        )
    }

    fn appointment_model(id: Uuid, doctor_id: Uuid, patient_id: Uuid) -> appointment::Model {
        appointment::Model {
            id,
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

    fn patient_model(id: Uuid, name: &str) -> patient_profile::Model {
        patient_profile::Model {
            id,
            user_id: Uuid::new_v4(),
            name: name.to_string(),
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

    fn write_request(appointment_id: Uuid, medications: Vec<NewMedicationLine>) -> WritePrescription {
        WritePrescription {
            appointment_id,
            patient_id: None,
            diagnosis: "Seasonal flu".to_string(),
            description: "Rest and fluids".to_string(),
            prescription_date: None,
            medications,
        }
    }

    #[tokio::test]
    async fn create_attaches_lines_and_patient_name() {
        let doctor_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let appointment_id = Uuid::new_v4();
        let prescription_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[appointment_model(appointment_id, doctor_id, patient_id)]])
            .append_query_results([[prescription_model(prescription_id, doctor_id, patient_id)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[line_model(prescription_id)]])
            .append_query_results([[patient_model(patient_id, "Alice")]])
            .into_connection();

        let view = service(&db)
            .create(
                &doctor_id,
                write_request(
                    appointment_id,
                    vec![NewMedicationLine {
                        medication_name: "Paracetamol".to_string(),
                        dosage: "500mg".to_string(),
                        frequency: "TWICE_DAILY".to_string(),
                        duration: "5 days".to_string(),
                    }],
                ),
            )
            .await
            .expect("create should succeed");
        assert_eq!(view.medications.len(), 1);
        assert_eq!(view.patient_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn create_rejects_an_appointment_of_another_doctor() {
        let doctor_id = Uuid::new_v4();
        let appointment_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[appointment_model(
                appointment_id,
                Uuid::new_v4(),
                Uuid::new_v4(),
            )]])
            .into_connection();

        let err = service(&db)
            .create(&doctor_id, write_request(appointment_id, Vec::new()))
            .await
            .expect_err("create should fail");
        assert_eq!(err.code(), "forbidden");
    }

    #[tokio::test]
    async fn create_rejects_blank_diagnosis_before_touching_the_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut req = write_request(Uuid::new_v4(), Vec::new());
        req.diagnosis = "   ".to_string();

        let err = service(&db)
            .create(&Uuid::new_v4(), req)
            .await
            .expect_err("create should fail");
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn request_accepts_patient_id_and_ignores_extra_fields() {
        let req: WritePrescription = serde_json::from_value(serde_json::json!({
            "appointment_id": Uuid::new_v4(),
            "patient_id": Uuid::new_v4(),
            "diagnosis": "Seasonal flu",
            "notes": "carried over from the previous visit",
            "medications": [{
                "medication_name": "Paracetamol",
                "dosage": "500mg",
                "frequency": "TWICE_DAILY",
                "duration": "5 days"
            }]
        }))
        .expect("payload should deserialize");
        assert!(req.patient_id.is_some());
        assert_eq!(req.medications.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_a_patient_id_that_contradicts_the_appointment() {
        let doctor_id = Uuid::new_v4();
        let appointment_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[appointment_model(
                appointment_id,
                doctor_id,
                Uuid::new_v4(),
            )]])
            .into_connection();

        let mut req = write_request(appointment_id, Vec::new());
        req.patient_id = Some(Uuid::new_v4());
        let err = service(&db)
            .create(&doctor_id, req)
            .await
            .expect_err("create should fail");
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn any_rolled_back_write_maps_to_transaction_failed() {
        let err = write_failure(DaoLayerError::UniqueViolation {
            entity: "medication line",
        });
        assert_eq!(err.code(), "transaction_failed");
        let err = write_failure(DaoLayerError::NotFound {
            entity: "prescription",
        });
        assert_eq!(err.code(), "transaction_failed");
    }

    #[tokio::test]
    async fn failed_write_surfaces_as_transaction_failed() {
        let doctor_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let appointment_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[appointment_model(appointment_id, doctor_id, patient_id)]])
            .append_query_errors([sea_orm::DbErr::Custom("connection lost".to_string())])
            .into_connection();

        let err = service(&db)
            .create(&doctor_id, write_request(appointment_id, Vec::new()))
            .await
            .expect_err("create should fail");
        assert_eq!(err.code(), "transaction_failed");
    }

    #[tokio::test]
    async fn list_groups_lines_under_their_prescriptions() {
        let doctor_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                prescription_model(first, doctor_id, patient_id),
                prescription_model(second, doctor_id, patient_id),
            ]])
            .append_query_results([vec![line_model(first), line_model(first)]])
            .append_query_results([[patient_model(patient_id, "Alice")]])
            .into_connection();

        let views = service(&db)
            .list_for_doctor(&doctor_id)
            .await
            .expect("list should succeed");
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].medications.len(), 2);
        assert!(views[1].medications.is_empty());
    }
}
