use std::sync::Arc;

use axum::{Router, middleware::from_fn};
use tower_http::trace::TraceLayer;

use crate::{middleware::json_error_middleware, state::AppState};

pub mod admin;
pub mod auth;
pub mod doctors;
pub mod patients;
pub mod public;
pub mod users;

pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/users", users::router(state.clone()))
        .nest("/patients", patients::router(state.clone()))
        .nest("/doctors", doctors::router(state.clone()))
        .nest("/admin", admin::router(state));

    Router::new()
        .merge(public::router())
        .nest(API_PREFIX, api)
        .layer(from_fn(json_error_middleware))
        .layer(TraceLayer::new_for_http())
}
