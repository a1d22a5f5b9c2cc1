//! Pipecast API Server
//!
//! Main entry point for the Pipecast forecasting service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pipecast_api::{AppState, create_router};
use pipecast_core::forecast::{ForecastService, ForecastStore, InMemoryForecastStore};
use pipecast_db::{ForecastRepository, connect_with_pool};
use pipecast_shared::{AppConfig, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipecast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        horizon_years = config.forecast.horizon_years,
        what_if_quarters = config.forecast.what_if_quarters,
        revenue_new_share_bp = config.forecast.revenue_new_share_bp,
        "Forecast settings loaded"
    );

    match config.database.backend {
        StorageBackend::Postgres => {
            let db = connect_with_pool(
                &config.database.url,
                config.database.max_connections,
                config.database.min_connections,
            )
            .await?;
            info!("Connected to database");
            serve(Arc::new(ForecastRepository::new(db)), &config).await
        }
        StorageBackend::Memory => {
            warn!("Using in-memory forecast store; data is lost on restart");
            serve(Arc::new(InMemoryForecastStore::new()), &config).await
        }
    }
}

/// Builds the router over `store` and serves it until shutdown.
async fn serve<S: ForecastStore + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let state = AppState::new(ForecastService::new(store, config.forecast));
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
