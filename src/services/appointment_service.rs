use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::{
    db::dao::{AppointmentDao, NewAppointment, ProfileDao},
    db::entities::{appointment, patient_profile},
    error::AppError,
};

#[derive(Debug, serde::Deserialize)]
pub struct BookAppointment {
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<FixedOffset>,
    pub appointment_type: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Appointment row plus the display fields of the counterparty. Which side
/// is filled depends on who asked for the list.
#[derive(Debug, serde::Serialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<FixedOffset>,
    pub appointment_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

impl AppointmentView {
    fn bare(model: appointment::Model) -> Self {
        Self {
            id: model.id,
            patient_id: model.patient_id,
            doctor_id: model.doctor_id,
            appointment_date: model.appointment_date,
            appointment_type: model.appointment_type,
            status: model.status,
            doctor_name: None,
            patient_name: None,
        }
    }
}

#[derive(Clone)]
pub struct AppointmentService {
    appointments: AppointmentDao,
    profiles: ProfileDao,
}

impl AppointmentService {
    pub fn new(appointments: AppointmentDao, profiles: ProfileDao) -> Self {
        Self {
            appointments,
            profiles,
        }
    }

    pub async fn book(
        &self,
        patient_id: &Uuid,
        req: BookAppointment,
    ) -> Result<AppointmentView, AppError> {
        if req.appointment_type.trim().is_empty() {
            return Err(AppError::validation("Appointment type is required"));
        }
        self.profiles
            .find_patient(patient_id)
            .await?
            .ok_or_else(|| AppError::not_found("Patient not found"))?;
        let doctor = self
            .profiles
            .find_doctor(&req.doctor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Doctor not found"))?;

        let created = self
            .appointments
            .create(NewAppointment {
                patient_id: *patient_id,
                doctor_id: req.doctor_id,
                appointment_date: req.appointment_date,
                appointment_type: req.appointment_type,
                status: req.status,
            })
            .await?;

        let mut view = AppointmentView::bare(created);
        view.doctor_name = Some(doctor.name);
        Ok(view)
    }

    pub async fn list_for_patient(
        &self,
        patient_id: &Uuid,
    ) -> Result<Vec<AppointmentView>, AppError> {
        let rows = self.appointments.for_patient(patient_id).await?;

        let mut doctor_ids: Vec<Uuid> = rows.iter().map(|a| a.doctor_id).collect();
        doctor_ids.sort_unstable();
        doctor_ids.dedup();
        let doctors: HashMap<Uuid, String> = self
            .profiles
            .find_doctors_by_ids(&doctor_ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|model| {
                let mut view = AppointmentView::bare(model);
                view.doctor_name = doctors.get(&view.doctor_id).cloned();
                view
            })
            .collect())
    }

    pub async fn list_for_doctor(
        &self,
        doctor_id: &Uuid,
    ) -> Result<Vec<AppointmentView>, AppError> {
        let rows = self.appointments.for_doctor(doctor_id).await?;

        let mut patient_ids: Vec<Uuid> = rows.iter().map(|a| a.patient_id).collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();
        let patients: HashMap<Uuid, String> = self
            .profiles
            .find_patients_by_ids(&patient_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|model| {
                let mut view = AppointmentView::bare(model);
                view.patient_name = patients.get(&view.patient_id).cloned();
                view
            })
            .collect())
    }

    /// Distinct patients this doctor has seen, via the appointment history.
    pub async fn patients_of(
        &self,
        doctor_id: &Uuid,
    ) -> Result<Vec<patient_profile::Model>, AppError> {
        let rows = self.appointments.for_doctor(doctor_id).await?;
        let mut patient_ids: Vec<Uuid> = rows.iter().map(|a| a.patient_id).collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();
        Ok(self.profiles.find_patients_by_ids(&patient_ids).await?)
    }
}
