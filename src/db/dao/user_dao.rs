use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{DaoLayerError, DaoResult};
use crate::auth::Role;
use crate::db::entities::{
    admin_profile, doctor_profile, patient_profile, prelude::User, user,
};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl UserDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> DaoResult<Option<user::Model>> {
        Ok(User::find_by_id(*id).one(&self.db).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    pub async fn find_all(&self) -> DaoResult<Vec<user::Model>> {
        Ok(User::find().all(&self.db).await?)
    }

    pub async fn count(&self) -> DaoResult<u64> {
        Ok(User::find().count(&self.db).await?)
    }

    /// Creates the user row together with its placeholder role profile, in
    /// one transaction so no identity is ever visible without a profile.
    pub async fn create_with_profile(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> DaoResult<user::Model> {
        let txn = self.db.begin().await?;

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
            profile_complete: Set(false),
            ..Default::default()
        };
        let created = model
            .insert(&txn)
            .await
            .map_err(|err| DaoLayerError::from_write("user", err))?;

        insert_placeholder_profile(&txn, &created.id, role).await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Admin-only role change. Backfills a placeholder profile for the new
    /// role when none exists, keeping the one-profile-per-role invariant.
    pub async fn update_role(&self, id: &Uuid, role: Role) -> DaoResult<user::Model> {
        let txn = self.db.begin().await?;

        let existing = User::find_by_id(*id)
            .one(&txn)
            .await?
            .ok_or(DaoLayerError::NotFound { entity: "user" })?;

        let mut active: user::ActiveModel = existing.into();
        active.role = Set(role.as_str().to_string());
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active
            .update(&txn)
            .await
            .map_err(|err| DaoLayerError::from_write("user", err))?;

        if !profile_exists(&txn, &updated.id, role).await? {
            insert_placeholder_profile(&txn, &updated.id, role).await?;
        }

        txn.commit().await?;
        Ok(updated)
    }

    pub async fn set_profile_complete(&self, id: &Uuid, complete: bool) -> DaoResult<()> {
        let existing = User::find_by_id(*id)
            .one(&self.db)
            .await?
            .ok_or(DaoLayerError::NotFound { entity: "user" })?;

        let mut active: user::ActiveModel = existing.into();
        active.profile_complete = Set(complete);
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &Uuid) -> DaoResult<()> {
        let result = User::delete_by_id(*id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound { entity: "user" });
        }
        Ok(())
    }
}

fn placeholder_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

async fn profile_exists(txn: &DatabaseTransaction, user_id: &Uuid, role: Role) -> DaoResult<bool> {
    let found = match role {
        Role::Patient => patient_profile::Entity::find()
            .filter(patient_profile::Column::UserId.eq(*user_id))
            .one(txn)
            .await?
            .is_some(),
        Role::Doctor => doctor_profile::Entity::find()
            .filter(doctor_profile::Column::UserId.eq(*user_id))
            .one(txn)
            .await?
            .is_some(),
        Role::Admin => admin_profile::Entity::find()
            .filter(admin_profile::Column::UserId.eq(*user_id))
            .one(txn)
            .await?
            .is_some(),
    };
    Ok(found)
}

async fn insert_placeholder_profile(
    txn: &DatabaseTransaction,
    user_id: &Uuid,
    role: Role,
) -> DaoResult<()> {
    match role {
        Role::Patient => {
            patient_profile::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(*user_id),
                name: Set("Patient".to_string()),
                phone: Set(String::new()),
                date_of_birth: Set(placeholder_birth_date()),
                gender: Set("OTHER".to_string()),
                blood_group: Set("O_POSITIVE".to_string()),
                emergency_contact: Set(None),
                ..Default::default()
            }
            .insert(txn)
            .await
            .map_err(|err| DaoLayerError::from_write("patient profile", err))?;
        }
        Role::Doctor => {
            doctor_profile::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(*user_id),
                name: Set("Doctor".to_string()),
                phone: Set(String::new()),
                date_of_birth: Set(placeholder_birth_date()),
                specialization: Set(None),
                license_number: Set("N/A".to_string()),
                consultation_fee: Set(0),
                experience_years: Set(0),
                ..Default::default()
            }
            .insert(txn)
            .await
            .map_err(|err| DaoLayerError::from_write("doctor profile", err))?;
        }
        Role::Admin => {
            admin_profile::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(*user_id),
                name: Set("Admin".to_string()),
                phone: Set(String::new()),
                ..Default::default()
            }
            .insert(txn)
            .await
            .map_err(|err| DaoLayerError::from_write("admin profile", err))?;
        }
    }
    Ok(())
}
