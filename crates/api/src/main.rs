use anyhow::Context;
use lp_il_api::{ApiServer, AppConfig, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;
    let state = AppState::from_config(&config).context("building analyzers")?;
    info!(chains = ?state.supported_chains(), "analyzers ready");

    ApiServer::new(config.server, state).run().await?;
    Ok(())
}
