mod config;
mod handlers;
mod models;
mod pages;
mod registry;
mod router;
mod trivia;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use pages::Renderer;
use registry::Registry;
use trivia::{TriviaClient, TriviaSource};

/// Application state shared across handlers
pub struct AppState {
    pub registry: Registry,
    pub renderer: Renderer,
    pub trivia: Arc<dyn TriviaSource>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a .env file before reading any configuration
    let env_file = dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "device_registry=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = env_file {
        tracing::info!("Loaded environment from {}", path.display());
    }

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting Device Registry");
    tracing::info!(
        "Seed: {}",
        if cfg.seed_path.is_empty() { "<embedded>" } else { cfg.seed_path.as_str() }
    );
    tracing::info!("Listen: {}", cfg.listen_addr);

    // Seed the registry; the model enumeration is fixed from here on
    let seed = registry::seeds::load(&cfg.seed_path).await?;
    let registry = Registry::seeded(seed);
    tracing::info!(
        "Registry seeded with {} devices ({} models)",
        registry.count().await,
        registry.schema().models().len()
    );

    let renderer = Renderer::load(&cfg.templates_dir)?;
    let trivia = TriviaClient::new(&cfg.joke_api_url, &cfg.pokeapi_url)?;

    // Create app state
    let state = Arc::new(AppState {
        registry,
        renderer,
        trivia: Arc::new(trivia),
    });

    // Build router
    let app = router::build(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("Device Registry listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Device Registry shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
