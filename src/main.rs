use anyhow::{Context, Result};
use i18n_gateway::{
    config::Config,
    i18n::DictionaryLoader,
    server::{build_router, AppState},
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_gateway=info".parse()?),
        )
        .init();

    info!("Starting i18n gateway");

    // Load configuration from environment
    let config = Config::from_env()?;

    // A broken locale registry is fatal
    let registry = Arc::new(
        config
            .build_registry()
            .context("Invalid locale configuration")?,
    );
    info!(
        "Serving {} locales (default '{}')",
        registry.all().len(),
        registry.default_locale().id()
    );

    let loader = Arc::new(
        DictionaryLoader::new(registry.clone(), config.bundle_source()?)
            .with_options(config.loader_options()),
    );
    info!("Dictionaries from {}", loader.source_description());

    if config.preload_dictionaries {
        for e in loader.preload_all().await {
            warn!("Preload failed: {}", e);
        }
    }

    let pipeline = Arc::new(config.pipeline(registry.clone()));
    let app = build_router(AppState::new(registry, loader, pipeline));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
