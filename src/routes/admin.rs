use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AdminRole,
    middleware::RoleGuard,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, UserIdentity, admin_service::AnalyticsSummary},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RoleChangeRequest {
    pub role: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}/role", put(change_role))
        .route("/users/{id}", delete(delete_user))
        .route("/analytics", get(analytics))
        .with_state(state)
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminRole>,
) -> ApiResult<Vec<UserIdentity>> {
    let users = ServiceContext::from_state(&state).admin().list_users().await?;
    JsonApiResponse::ok(users)
}

async fn change_role(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminRole>,
    Path(id): Path<Uuid>,
    Json(body): Json<RoleChangeRequest>,
) -> ApiResult<UserIdentity> {
    let updated = ServiceContext::from_state(&state)
        .admin()
        .update_role(&id, &body.role)
        .await?;
    JsonApiResponse::ok(updated)
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminRole>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ServiceContext::from_state(&state)
        .admin()
        .delete_user(&id)
        .await?;
    JsonApiResponse::ok(())
}

async fn analytics(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminRole>,
) -> ApiResult<AnalyticsSummary> {
    let summary = ServiceContext::from_state(&state).admin().analytics().await?;
    JsonApiResponse::ok(summary)
}
