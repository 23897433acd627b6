#![forbid(unsafe_code)]

use cmdapi_domain::CommandApiRepo;
use cmdapi_infra::InMemoryCommandRepo;
use cmdapi_server::{AppState, ServerConfig, build_router, telemetry};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

async fn build_repo(config: &ServerConfig) -> anyhow::Result<Arc<dyn CommandApiRepo>> {
    match config.database_url.as_deref() {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let repo =
                cmdapi_infra::PgCommandRepo::connect(url, config.db_max_connections).await?;
            info!(max_connections = config.db_max_connections, "using postgres repository");
            Ok(Arc::new(repo))
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            warn!("DATABASE_URL is set but postgres support is not compiled in; using in-memory repository");
            Ok(Arc::new(InMemoryCommandRepo::new()))
        }
        None => {
            warn!("DATABASE_URL not set; commands are kept in memory only");
            Ok(Arc::new(InMemoryCommandRepo::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    telemetry::init_tracing(config.log_json)?;

    let repo = build_repo(&config).await?;
    let app = build_router(AppState::new(repo)?);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "command api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
