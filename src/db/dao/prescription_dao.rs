use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{DaoLayerError, DaoResult};
use crate::db::entities::{
    medication_line, prelude::{MedicationLine, Prescription}, prescription,
};

#[derive(Debug)]
pub struct NewPrescription {
    pub appointment_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub prescription_date: DateTime<FixedOffset>,
    pub diagnosis: String,
    pub description: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewMedicationLine {
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

#[derive(Clone)]
pub struct PrescriptionDao {
    db: DatabaseConnection,
}

impl PrescriptionDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    /// Writes the prescription header and all of its medication lines in one
    /// transaction. Either everything lands or nothing does, so a
    /// prescription can never be read back with half its medications.
    pub async fn create_with_medications(
        &self,
        new: NewPrescription,
        lines: Vec<NewMedicationLine>,
    ) -> DaoResult<(prescription::Model, Vec<medication_line::Model>)> {
        let txn = self.db.begin().await?;

        let header = prescription::ActiveModel {
            id: Set(Uuid::new_v4()),
            appointment_id: Set(new.appointment_id),
            doctor_id: Set(new.doctor_id),
            patient_id: Set(new.patient_id),
            prescription_date: Set(new.prescription_date),
            diagnosis: Set(new.diagnosis),
            description: Set(new.description),
            ..Default::default()
        };
        let created = header
            .insert(&txn)
            .await
            .map_err(|err| DaoLayerError::from_write("prescription", err))?;

        // insert_many on an empty batch is a backend error, not a no-op
        if !lines.is_empty() {
            let models = lines.into_iter().map(|line| medication_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                prescription_id: Set(created.id),
                medication_name: Set(line.medication_name),
                dosage: Set(line.dosage),
                frequency: Set(line.frequency),
                duration: Set(line.duration),
                ..Default::default()
            });
            MedicationLine::insert_many(models)
                .exec_without_returning(&txn)
                .await
                .map_err(|err| DaoLayerError::from_write("medication line", err))?;
        }

        txn.commit().await?;

        let stored_lines = self.lines_for(&created.id).await?;
        Ok((created, stored_lines))
    }

    pub async fn for_doctor(&self, doctor_id: &Uuid) -> DaoResult<Vec<prescription::Model>> {
        Ok(Prescription::find()
            .filter(prescription::Column::DoctorId.eq(*doctor_id))
            .order_by_desc(prescription::Column::PrescriptionDate)
            .all(&self.db)
            .await?)
    }

    pub async fn for_patient(&self, patient_id: &Uuid) -> DaoResult<Vec<prescription::Model>> {
        Ok(Prescription::find()
            .filter(prescription::Column::PatientId.eq(*patient_id))
            .order_by_desc(prescription::Column::PrescriptionDate)
            .all(&self.db)
            .await?)
    }

    pub async fn lines_for(&self, prescription_id: &Uuid) -> DaoResult<Vec<medication_line::Model>> {
        Ok(MedicationLine::find()
            .filter(medication_line::Column::PrescriptionId.eq(*prescription_id))
            .all(&self.db)
            .await?)
    }

    pub async fn lines_for_many(
        &self,
        prescription_ids: &[Uuid],
    ) -> DaoResult<Vec<medication_line::Model>> {
        if prescription_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(MedicationLine::find()
            .filter(
                medication_line::Column::PrescriptionId.is_in(prescription_ids.iter().copied()),
            )
            .all(&self.db)
            .await?)
    }
}
