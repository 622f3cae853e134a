use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    auth::DoctorRole,
    db::dao::{DaoContext, DoctorProfileUpdate},
    db::entities::{doctor_profile, patient_profile},
    error::AppError,
    middleware::{AuthUser, RoleGuard},
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        appointment_service::AppointmentView,
        prescription_service::{PrescriptionView, WritePrescription},
        record_service::PatientRecord,
    },
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/{id}", put(update_profile))
        .route("/{id}/appointments", get(appointments))
        .route("/{id}/patients", get(patients))
        .route("/{id}/prescriptions", post(write_prescription))
        .route("/{id}/prescriptions", get(prescriptions))
        .route("/{id}/records/{patient_id}", get(patient_record))
        .with_state(state)
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    guard: RoleGuard<DoctorRole>,
    Path(id): Path<Uuid>,
    Json(changes): Json<DoctorProfileUpdate>,
) -> ApiResult<doctor_profile::Model> {
    let daos = DaoContext::new(&state.db);
    own_profile(&daos, &id, &guard.user).await?;

    let updated = daos
        .profile()
        .update_doctor(&id, changes)
        .await
        .map_err(AppError::from)?;
    daos.user()
        .set_profile_complete(&guard.user.id, true)
        .await
        .map_err(AppError::from)?;
    JsonApiResponse::ok(updated)
}

async fn appointments(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<DoctorRole>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<AppointmentView>> {
    let views = ServiceContext::from_state(&state)
        .appointment()
        .list_for_doctor(&id)
        .await?;
    JsonApiResponse::ok(views)
}

async fn patients(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<DoctorRole>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<patient_profile::Model>> {
    let patients = ServiceContext::from_state(&state)
        .appointment()
        .patients_of(&id)
        .await?;
    JsonApiResponse::ok(patients)
}

async fn write_prescription(
    State(state): State<Arc<AppState>>,
    guard: RoleGuard<DoctorRole>,
    Path(id): Path<Uuid>,
    Json(body): Json<WritePrescription>,
) -> ApiResult<PrescriptionView> {
    let daos = DaoContext::new(&state.db);
    own_profile(&daos, &id, &guard.user).await?;

    let view = ServiceContext::from_state(&state)
        .prescription()
        .create(&id, body)
        .await?;
    JsonApiResponse::created(view)
}

async fn prescriptions(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<DoctorRole>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<PrescriptionView>> {
    let views = ServiceContext::from_state(&state)
        .prescription()
        .list_for_doctor(&id)
        .await?;
    JsonApiResponse::ok(views)
}

/// Everything this doctor holds on one patient: profile, the appointments
/// between the two, and the prescriptions written across them.
async fn patient_record(
    State(state): State<Arc<AppState>>,
    guard: RoleGuard<DoctorRole>,
    Path((id, patient_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<PatientRecord> {
    let daos = DaoContext::new(&state.db);
    own_profile(&daos, &id, &guard.user).await?;

    let record = ServiceContext::from_state(&state)
        .record()
        .patient_record(&id, &patient_id)
        .await?;
    JsonApiResponse::ok(record)
}

/// Writes only touch the caller's own doctor profile.
async fn own_profile(daos: &DaoContext, id: &Uuid, user: &AuthUser) -> Result<(), AppError> {
    let profile = daos
        .profile()
        .find_doctor(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Doctor not found"))?;
    if profile.user_id != user.id {
        return Err(AppError::forbidden("Not your profile"));
    }
    Ok(())
}
