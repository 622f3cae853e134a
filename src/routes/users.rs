use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::AuthUser,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, UserIdentity},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/{id}", get(by_id))
        .with_state(state)
}

async fn me(State(state): State<Arc<AppState>>, user: AuthUser) -> ApiResult<UserIdentity> {
    let identity = ServiceContext::from_state(&state)
        .user()
        .find_identity(&user.id)
        .await?
        .ok_or_else(|| AppError::unauthenticated("Token is invalid or expired"))?;
    JsonApiResponse::ok(identity)
}

async fn by_id(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<UserIdentity> {
    let identity = ServiceContext::from_state(&state)
        .user()
        .find_identity(&id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    JsonApiResponse::ok(identity)
}
