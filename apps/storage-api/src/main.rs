//! Storage API - product inventory REST server

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use database::postgres::connect_from_config_with_retry;
use domain_products::InMemoryProductRepository;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StorageConfig};
use state::{AppState, Storage};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let storage = match &config.storage {
        StorageConfig::Postgres(pg) => {
            info!("Connecting to PostgreSQL");
            let db = connect_from_config_with_retry(
                pg.clone(),
                Some(RetryConfig::new().with_max_retries(5)),
            )
            .await?;
            Storage::Postgres(db)
        }
        StorageConfig::Memory => {
            warn!("Using in-memory product storage; data is lost on restart");
            Storage::Memory(InMemoryProductRepository::new())
        }
    };

    let state = AppState {
        config: config.clone(),
        storage,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, async move {
        if let Storage::Postgres(db) = state.storage {
            info!("Shutting down: closing PostgreSQL pool");
            match db.close().await {
                Ok(()) => info!("PostgreSQL pool closed"),
                Err(e) => warn!("Failed to close PostgreSQL pool: {}", e),
            }
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Storage API shutdown complete");
    Ok(())
}
