use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    auth::PatientRole,
    db::dao::{DaoContext, PatientProfileUpdate},
    db::entities::patient_profile,
    error::AppError,
    middleware::{AuthUser, RoleGuard},
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        appointment_service::{AppointmentView, BookAppointment},
        record_service::HistoryView,
    },
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/{id}", get(profile))
        .route("/{id}", put(update_profile))
        .route("/{id}/appointments", get(appointments))
        .route("/{id}/appointments", post(book_appointment))
        .route("/{id}/history", get(history))
        .with_state(state)
}

async fn profile(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<patient_profile::Model> {
    let profile = DaoContext::new(&state.db)
        .profile()
        .find_patient(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Patient not found"))?;
    JsonApiResponse::ok(profile)
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    guard: RoleGuard<PatientRole>,
    Path(id): Path<Uuid>,
    Json(changes): Json<PatientProfileUpdate>,
) -> ApiResult<patient_profile::Model> {
    let daos = DaoContext::new(&state.db);
    own_profile(&daos, &id, &guard.user).await?;

    let updated = daos
        .profile()
        .update_patient(&id, changes)
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
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<AppointmentView>> {
    let views = ServiceContext::from_state(&state)
        .appointment()
        .list_for_patient(&id)
        .await?;
    JsonApiResponse::ok(views)
}

async fn history(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<HistoryView>> {
    let views = ServiceContext::from_state(&state)
        .record()
        .history_for_patient(&id)
        .await?;
    JsonApiResponse::ok(views)
}

async fn book_appointment(
    State(state): State<Arc<AppState>>,
    guard: RoleGuard<PatientRole>,
    Path(id): Path<Uuid>,
    Json(body): Json<BookAppointment>,
) -> ApiResult<AppointmentView> {
    let daos = DaoContext::new(&state.db);
    own_profile(&daos, &id, &guard.user).await?;

    let view = ServiceContext::from_state(&state)
        .appointment()
        .book(&id, body)
        .await?;
    JsonApiResponse::created(view)
}

/// Writes only touch the caller's own patient profile.
async fn own_profile(daos: &DaoContext, id: &Uuid, user: &AuthUser) -> Result<(), AppError> {
    let profile = daos
        .profile()
        .find_patient(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Patient not found"))?;
    if profile.user_id != user.id {
        return Err(AppError::forbidden("Not your profile"));
    }
    Ok(())
}
