use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ann_api::{
    config::{Config, StoreKind},
    db::{self, MemorySessionFactory, PgSessionFactory, SessionFactory},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let sessions: Arc<dyn SessionFactory> = match config.store {
        StoreKind::Postgres => {
            let pool = db::create_pool(config.connect_options(), config.db_max_connections).await?;
            db::run_migrations(&pool).await?;
            info!(
                "Database connected at {}:{} and migrations applied",
                config.postgres_host, config.postgres_port
            );
            Arc::new(PgSessionFactory::new(pool))
        }
        StoreKind::Memory => {
            info!("Using in-memory store; records will not survive a restart");
            Arc::new(MemorySessionFactory::new())
        }
    };

    let app = ann_api::app(AppState::new(sessions.clone()));

    let addr = format!("{}:{}", config.host, config.port);
    info!("Announcement API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sessions.close().await;
    info!("Announcement API shut down");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
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
