use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    let auth = &cfg.auth;
    if auth.access_secret.trim().is_empty() {
        errors.push("auth.access_secret must not be empty".to_string());
    }

    if auth.refresh_secret.trim().is_empty() {
        errors.push("auth.refresh_secret must not be empty".to_string());
    }

    // A refresh token must never verify as an access token.
    if !auth.access_secret.trim().is_empty() && auth.access_secret == auth.refresh_secret {
        errors.push("auth.refresh_secret must differ from auth.access_secret".to_string());
    }

    if auth.access_ttl_secs == 0 {
        errors.push("auth.access_ttl_secs must be > 0".to_string());
    }

    if auth.refresh_ttl_secs <= auth.access_ttl_secs {
        errors.push("auth.refresh_ttl_secs must be greater than auth.access_ttl_secs".to_string());
    }

    if auth.hashing.memory_kib == 0 || auth.hashing.iterations == 0 || auth.hashing.parallelism == 0
    {
        errors.push("auth.hashing costs must all be > 0".to_string());
    }

    if auth.admin_email.trim().is_empty() {
        errors.push("auth.admin_email must not be empty".to_string());
    }

    if auth.admin_password.len() < 8 {
        errors.push("auth.admin_password must be at least 8 characters".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
