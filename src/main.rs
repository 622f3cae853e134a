use std::net::SocketAddr;

use carelink::{
    auth::seed::seed_admin,
    config::AppConfig,
    db::{connection, dao::DaoContext},
    logging::init_tracing,
    routes::router,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging);

    let db = connection::connect(&cfg.database).await?;

    let state = AppState::new(cfg, db).map_err(|err| anyhow::anyhow!(err.to_string()))?;
    seed_admin(
        &state.config.auth,
        &DaoContext::new(&state.db),
        &state.hasher,
    )
    .await?;

    let app = router(state.clone());

    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.general.host.as_str(),
        state.config.general.port
    )
    .parse()?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
