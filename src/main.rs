//! Server binary: loads config, prepares the database and serves the API.

use std::sync::Arc;
use subscriptions::{
    apply_migrations, build_router, connect_pool, ensure_database_exists, AppConfig, AppState,
    PgSubscriptionRepository, SubscriptionService,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .init();

    ensure_database_exists(&config.database_url).await?;
    let pool = connect_pool(&config).await?;
    apply_migrations(&pool).await?;

    let repo = Arc::new(PgSubscriptionRepository::new(pool.clone()));
    let state = AppState::new(SubscriptionService::new(repo));
    let app = build_router(state, config.http_body_limit);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
    tracing::info!("shutdown signal received");
}
