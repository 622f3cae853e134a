use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::{PasswordHasher, TokenService},
    config::AppConfig,
    error::AppError,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub tokens: TokenService,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Result<Arc<Self>, AppError> {
        let tokens = TokenService::from_config(&config.auth);
        let hasher = PasswordHasher::new(&config.auth.hashing)?;
        Ok(Arc::new(Self {
            config,
            db,
            tokens,
            hasher,
        }))
    }
}
