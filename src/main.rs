use std::error::Error;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jotz::adapters::http::app_router;
use jotz::adapters::postgres;
use jotz::adapters::{
    ExpirySweeper, ExpirySweeperConfig, InMemoryContentRepository, InMemorySessionRegistry,
    PostgresContentRepository, PostgresSessionRegistry,
};
use jotz::config::AppConfig;
use jotz::ports::{ContentRepository, SessionRegistry};

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received, draining connections");
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    info!(
        environment = ?config.server.environment,
        backend = ?config.storage.backend,
        "starting jotz"
    );

    let (registry, content): (Arc<dyn SessionRegistry>, Arc<dyn ContentRepository>) =
        if config.storage.uses_postgres() {
            let pool = postgres::connect(&config.database).await?;
            (
                Arc::new(PostgresSessionRegistry::new(pool.clone())),
                Arc::new(PostgresContentRepository::new(pool)),
            )
        } else {
            (
                Arc::new(InMemorySessionRegistry::new()),
                Arc::new(InMemoryContentRepository::new()),
            )
        };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = ExpirySweeper::with_config(
        registry.clone(),
        content.clone(),
        ExpirySweeperConfig::default().with_interval(config.retention.sweep_interval()),
    );
    let sweeper_task = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    let app = app_router(&config, registry, content);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper_task.await {
        tracing::warn!(error = %e, "expiry sweeper task ended abnormally");
    }
    info!("shutdown complete");

    Ok(())
}
