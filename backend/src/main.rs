use anyhow::Context;
use tracing::info;

use jungla_shifts::config::Config;
use jungla_shifts::storage::DbConnection;
use jungla_shifts::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jungla_shifts=info,tower_http=info".into()),
        )
        .init();

    // Missing configuration is fatal; there is no retry
    let config = Config::from_env().context("Invalid configuration")?;
    info!("Starting shift backend with {:?}", config);

    info!("Setting up database");
    let db = DbConnection::new(&config.database_url)
        .await
        .context("Failed to open the database")?;

    let state = AppState::new(&db, &config.api_key);
    let app = create_router(state, config.cors_origin.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    db.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
