use tracing::info;

use crate::{
    auth::{PasswordHasher, Role},
    config::AuthConfig,
    db::dao::DaoContext,
};

/// Idempotently creates the configured admin account. Runs at startup so a
/// fresh deployment always has a way in.
pub async fn seed_admin(
    cfg: &AuthConfig,
    daos: &DaoContext,
    hasher: &PasswordHasher,
) -> anyhow::Result<()> {
    let users = daos.user();
    if users.find_by_email(&cfg.admin_email).await?.is_some() {
        return Ok(());
    }

    let hash = hasher
        .hash(&cfg.admin_password)
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    users
        .create_with_profile(&cfg.admin_email, &hash, Role::Admin)
        .await?;
    info!(email = %cfg.admin_email, "seeded admin account");
    Ok(())
}
