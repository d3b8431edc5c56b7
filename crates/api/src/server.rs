use crate::config::ServerConfig;
use crate::routes::create_router;
use crate::state::AppState;
use tokio::net::TcpListener;
use tracing::info;

/// HTTP server for the estimator endpoints.
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    #[must_use]
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Serves until Ctrl-C.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn run(self) -> std::io::Result<()> {
        let address = self.config.bind_address();
        let listener = TcpListener::bind(&address).await?;
        info!(
            address = %address,
            chains = ?self.state.supported_chains(),
            "API server listening"
        );

        axum::serve(listener, create_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("shutdown signal received");
}
