use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use crate::{
    auth::TokenPair,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, UserIdentity},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    #[allow(dead_code)]
    pub email: String,
}

#[derive(Debug, serde::Serialize)]
pub struct AuthResponse {
    pub user: UserIdentity,
    pub tokens: TokenPair,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/password-reset", post(password_reset))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let services = ServiceContext::from_state(&state);
    let (user, tokens) = services
        .auth(&state.tokens, &state.hasher)
        .register(&body.email, &body.password, &body.role)
        .await?;
    JsonApiResponse::created(AuthResponse { user, tokens })
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let services = ServiceContext::from_state(&state);
    let (user, tokens) = services
        .auth(&state.tokens, &state.hasher)
        .login(&body.email, &body.password)
        .await?;
    JsonApiResponse::ok(AuthResponse { user, tokens })
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<TokenPair> {
    let services = ServiceContext::from_state(&state);
    let tokens = services
        .auth(&state.tokens, &state.hasher)
        .refresh(&body.refresh_token)
        .await?;
    JsonApiResponse::ok(tokens)
}

async fn logout(State(state): State<Arc<AppState>>) -> ApiResult<()> {
    let services = ServiceContext::from_state(&state);
    services.auth(&state.tokens, &state.hasher).logout();
    JsonApiResponse::ok(())
}

// No mail machinery behind this; the acknowledgement is deliberately the
// same whether or not the account exists.
async fn password_reset(Json(_body): Json<PasswordResetRequest>) -> ApiResult<()> {
    JsonApiResponse::ok(())
}
