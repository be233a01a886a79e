use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use warden::logging::init_tracing;
use warden::metrics::{init_metrics, metrics_app};
use warden::router::init_router;
use warden::state::AppState;
use warden_config::AppConfig;
use warden_core::PasswordHasher;
use warden_db::{MIGRATOR, PgCredentialStore, init_db_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let _log_guard = init_tracing(&config.logging)?;

    let metrics_handle = init_metrics().context("failed to install metrics recorder")?;

    let pool = init_db_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    MIGRATOR
        .run(&pool)
        .await
        .context("failed to run migrations")?;
    info!("Database ready");

    let hasher = PasswordHasher::new(config.hasher.cost, config.hasher.max_concurrency);
    let state = AppState::new(
        Arc::new(PgCredentialStore::new(pool)),
        hasher,
        &config.jwt,
        config.cors.clone(),
        config.server.request_timeout,
    );
    let app = init_router(state);

    match (config.server.metrics_addr, metrics_handle) {
        (Some(addr), Some(handle)) => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind metrics listener on {addr}"))?;
            info!(%addr, "Metrics available at /metrics");
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                    warn!(error = %e, "Metrics server stopped");
                }
            });
        }
        (Some(_), None) => warn!("METRICS_ADDR is set but observability is disabled"),
        _ => {}
    }

    let listener = tokio::net::TcpListener::bind(config.server.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.addr))?;
    info!(addr = %config.server.addr, "Server running");
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
