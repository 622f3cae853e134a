//! Fixtures for the integration suites: a router wired to whatever
//! `DatabaseConnection` the test supplies (usually a `MockDatabase`).

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    config::{AppConfig, AuthConfig, DatabaseConfig, GeneralConfig, HashingConfig, LoggingConfig},
    routes::router,
    state::AppState,
};

pub const TEST_ACCESS_SECRET: &[u8] = b"test-access-secret";
pub const TEST_REFRESH_SECRET: &[u8] = b"test-refresh-secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        general: GeneralConfig::default(),
        logging: LoggingConfig::default(),
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_idle: 1,
        },
        auth: AuthConfig {
            access_secret: String::from_utf8_lossy(TEST_ACCESS_SECRET).into_owned(),
            refresh_secret: String::from_utf8_lossy(TEST_REFRESH_SECRET).into_owned(),
            access_ttl_secs: 600,
            refresh_ttl_secs: 3600,
            hashing: HashingConfig {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
            admin_email: "admin@example.com".to_string(),
            admin_password: "adminpassword".to_string(),
        },
    }
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    AppState::new(test_config(), db).expect("test state should build")
}

pub fn test_router(db: DatabaseConnection) -> Router {
    router(test_state(db))
}
