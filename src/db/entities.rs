#[allow(unused_imports)]
pub mod prelude {
    pub use super::admin_profile::Entity as AdminProfile;
    pub use super::appointment::Entity as Appointment;
    pub use super::doctor_profile::Entity as DoctorProfile;
    pub use super::medical_history::Entity as MedicalHistory;
    pub use super::medication_line::Entity as MedicationLine;
    pub use super::patient_profile::Entity as PatientProfile;
    pub use super::prescription::Entity as Prescription;
    pub use super::user::Entity as User;
}

pub mod user {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub email: String,
        pub password_hash: String,
        pub role: String,
        #[sea_orm(default_value = false)]
        pub profile_complete: bool,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(has_many)]
        pub patient_profiles: HasMany<super::patient_profile::Entity>,
        #[sea_orm(has_many)]
        pub doctor_profiles: HasMany<super::doctor_profile::Entity>,
        #[sea_orm(has_many)]
        pub admin_profiles: HasMany<super::admin_profile::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod patient_profile {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "patient_profiles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub user_id: Uuid,
        pub name: String,
        pub phone: String,
        pub date_of_birth: Date,
        pub gender: String,
        pub blood_group: String,
        pub emergency_contact: Option<String>,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub user: HasOne<super::user::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod doctor_profile {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "doctor_profiles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub user_id: Uuid,
        pub name: String,
        pub phone: String,
        pub date_of_birth: Date,
        pub specialization: Option<String>,
        pub license_number: String,
        pub consultation_fee: i32,
        pub experience_years: i32,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub user: HasOne<super::user::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod admin_profile {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "admin_profiles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub user_id: Uuid,
        pub name: String,
        pub phone: String,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub user: HasOne<super::user::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod appointment {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "appointments")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(indexed)]
        pub patient_id: Uuid,
        #[sea_orm(indexed)]
        pub doctor_id: Uuid,
        pub appointment_date: DateTimeWithTimeZone,
        pub appointment_type: String,
        pub status: String,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(belongs_to, from = "patient_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub patient: HasOne<super::patient_profile::Entity>,
        #[sea_orm(belongs_to, from = "doctor_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub doctor: HasOne<super::doctor_profile::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod prescription {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "prescriptions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(indexed)]
        pub appointment_id: Uuid,
        #[sea_orm(indexed)]
        pub doctor_id: Uuid,
        #[sea_orm(indexed)]
        pub patient_id: Uuid,
        pub prescription_date: DateTimeWithTimeZone,
        pub diagnosis: String,
        pub description: String,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(belongs_to, from = "appointment_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub appointment: HasOne<super::appointment::Entity>,
        #[sea_orm(belongs_to, from = "doctor_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub doctor: HasOne<super::doctor_profile::Entity>,
        #[sea_orm(belongs_to, from = "patient_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub patient: HasOne<super::patient_profile::Entity>,
        #[sea_orm(has_many)]
        #[serde(skip)]
        pub medications: HasMany<super::medication_line::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod medical_history {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "medical_histories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(indexed)]
        pub patient_id: Uuid,
        #[sea_orm(indexed)]
        pub doctor_id: Uuid,
        pub condition: String,
        pub notes: Option<String>,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub updated_at: DateTimeWithTimeZone,
        #[sea_orm(belongs_to, from = "patient_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub patient: HasOne<super::patient_profile::Entity>,
        #[sea_orm(belongs_to, from = "doctor_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub doctor: HasOne<super::doctor_profile::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod medication_line {
    use sea_orm::entity::prelude::*;

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "medication_lines")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(indexed)]
        pub prescription_id: Uuid,
        pub medication_name: String,
        pub dosage: String,
        pub frequency: String,
        pub duration: String,
        #[sea_orm(default_expr = "Expr::current_timestamp()")]
        pub created_at: DateTimeWithTimeZone,
        #[sea_orm(belongs_to, from = "prescription_id", to = "id", on_delete = "Cascade")]
        #[serde(skip)]
        pub prescription: HasOne<super::prescription::Entity>,
    }

    impl ActiveModelBehavior for ActiveModel {}
}
