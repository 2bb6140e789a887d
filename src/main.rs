use anyhow::{Context, Result};
use localized_pages::config::{self, Config};
use localized_pages::render::MiniJinjaEngine;
use localized_pages::routes::{self, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter("localized_pages")?)
        .init();

    let config = Config::from_env()?;
    let table = config.load_locale_table()?;
    table.validate().context("Invalid locale table")?;

    info!(
        "Serving {} languages (default '{}') from {}",
        table.languages().len(),
        table.default_language(),
        config.template_dir.display()
    );

    let engine = Arc::new(MiniJinjaEngine::from_dir(&config.template_dir));
    let app = routes::router(AppState::new(table, engine), &config.site_root);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✓ Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
