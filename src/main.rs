use anyhow::Context;
use regform::{config::AppConfig, db, routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regform=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Invalid server configuration")?;

    // Storage must be ready before the listener opens
    let repository = db::connect(&config.storage).await.map_err(|e| {
        tracing::error!("Failed to initialize DB: {}", e);
        anyhow::Error::new(e).context(format!(
            "Failed to initialize {} storage",
            config.storage.backend_name()
        ))
    })?;

    let app = routes::router(AppState::new(repository), &config.server.static_dir);

    let addr = config.server.socket_addr();
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
