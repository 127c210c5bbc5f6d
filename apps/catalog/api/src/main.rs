use axum::middleware;
use axum_helpers::server::{create_production_app, create_router, health_router};
use axum_helpers::expose_error_details;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use domain_catalog::Repositories;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    let mongo_client =
        database::mongodb::connect_with_retry(&config.mongodb, RetryConfig::new()).await?;
    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let repositories = Repositories::mongo(&db);
    repositories.init_indexes().await?;

    let state = AppState {
        config,
        mongo_client,
        db,
        repositories,
    };

    let router = create_router(api::routes(&state), &state.config.server)
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    let app = if state.config.environment.is_development() {
        router.layer(middleware::from_fn(expose_error_details))
    } else {
        router
    };

    let mongo_client = state.mongo_client.clone();

    info!("Starting Catalog API with graceful shutdown (30s timeout)");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
