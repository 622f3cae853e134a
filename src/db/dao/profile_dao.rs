use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::{DaoLayerError, DaoResult};
use crate::db::entities::{
    admin_profile, doctor_profile, patient_profile,
    prelude::{AdminProfile, DoctorProfile, PatientProfile},
};

/// Fields a patient may change on their own profile. `None` leaves the
/// stored value untouched.
#[derive(Debug, Default, serde::Deserialize)]
pub struct PatientProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
}

/// Fields a doctor may change on their own profile.
#[derive(Debug, Default, serde::Deserialize)]
pub struct DoctorProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub consultation_fee: Option<i32>,
    pub experience_years: Option<i32>,
}

#[derive(Clone)]
pub struct ProfileDao {
    db: DatabaseConnection,
}

impl ProfileDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn find_patient(&self, id: &Uuid) -> DaoResult<Option<patient_profile::Model>> {
        Ok(PatientProfile::find_by_id(*id).one(&self.db).await?)
    }

    pub async fn find_patient_by_user(
        &self,
        user_id: &Uuid,
    ) -> DaoResult<Option<patient_profile::Model>> {
        Ok(PatientProfile::find()
            .filter(patient_profile::Column::UserId.eq(*user_id))
            .one(&self.db)
            .await?)
    }

    pub async fn find_doctor(&self, id: &Uuid) -> DaoResult<Option<doctor_profile::Model>> {
        Ok(DoctorProfile::find_by_id(*id).one(&self.db).await?)
    }

    pub async fn find_doctor_by_user(
        &self,
        user_id: &Uuid,
    ) -> DaoResult<Option<doctor_profile::Model>> {
        Ok(DoctorProfile::find()
            .filter(doctor_profile::Column::UserId.eq(*user_id))
            .one(&self.db)
            .await?)
    }

    pub async fn find_admin_by_user(
        &self,
        user_id: &Uuid,
    ) -> DaoResult<Option<admin_profile::Model>> {
        Ok(AdminProfile::find()
            .filter(admin_profile::Column::UserId.eq(*user_id))
            .one(&self.db)
            .await?)
    }

    pub async fn find_patients_by_ids(
        &self,
        ids: &[Uuid],
    ) -> DaoResult<Vec<patient_profile::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(PatientProfile::find()
            .filter(patient_profile::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?)
    }

    pub async fn find_doctors_by_ids(
        &self,
        ids: &[Uuid],
    ) -> DaoResult<Vec<doctor_profile::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(DoctorProfile::find()
            .filter(doctor_profile::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?)
    }

    pub async fn update_patient(
        &self,
        id: &Uuid,
        changes: PatientProfileUpdate,
    ) -> DaoResult<patient_profile::Model> {
        let existing = PatientProfile::find_by_id(*id)
            .one(&self.db)
            .await?
            .ok_or(DaoLayerError::NotFound {
                entity: "patient profile",
            })?;

        let mut active: patient_profile::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            active.date_of_birth = Set(date_of_birth);
        }
        if let Some(gender) = changes.gender {
            active.gender = Set(gender);
        }
        if let Some(blood_group) = changes.blood_group {
            active.blood_group = Set(blood_group);
        }
        if let Some(emergency_contact) = changes.emergency_contact {
            active.emergency_contact = Set(Some(emergency_contact));
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        Ok(active.update(&self.db).await?)
    }

    pub async fn update_doctor(
        &self,
        id: &Uuid,
        changes: DoctorProfileUpdate,
    ) -> DaoResult<doctor_profile::Model> {
        let existing = DoctorProfile::find_by_id(*id)
            .one(&self.db)
            .await?
            .ok_or(DaoLayerError::NotFound {
                entity: "doctor profile",
            })?;

        let mut active: doctor_profile::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            active.date_of_birth = Set(date_of_birth);
        }
        if let Some(specialization) = changes.specialization {
            active.specialization = Set(Some(specialization));
        }
        if let Some(license_number) = changes.license_number {
            active.license_number = Set(license_number);
        }
        if let Some(consultation_fee) = changes.consultation_fee {
            active.consultation_fee = Set(consultation_fee);
        }
        if let Some(experience_years) = changes.experience_years {
            active.experience_years = Set(experience_years);
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        Ok(active.update(&self.db).await?)
    }

    pub async fn count_patients(&self) -> DaoResult<u64> {
        Ok(PatientProfile::find().count(&self.db).await?)
    }

    pub async fn count_doctors(&self) -> DaoResult<u64> {
        Ok(DoctorProfile::find().count(&self.db).await?)
    }
}
