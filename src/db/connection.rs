use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

/// Opens the pool and syncs the schema for this crate's entities. Clinical
/// writes hold a transaction across two inserts, so acquire gives up after
/// five seconds rather than queueing requests indefinitely.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!(
        max = cfg.max_connections,
        min = cfg.min_idle,
        "database pool ready"
    );

    db.get_schema_registry("carelink::db::entities::*")
        .sync(&db)
        .await?;
    info!("schema synced from entity definitions");
    Ok(db)
}
