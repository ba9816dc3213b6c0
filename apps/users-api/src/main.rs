use axum::Router;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// `/api/*` routes with OpenAPI docs, plus the `/health` liveness probe
fn build_app(state: &AppState) -> eyre::Result<Router> {
    let router =
        axum_helpers::create_router::<openapi::ApiDoc>(api::routes(state), &state.config.server)?;
    Ok(router.merge(health_router(state.config.app)))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(url = %config.mongodb.redacted_url(), "Connecting to MongoDB");
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    info!(
        database = config.mongodb.database(),
        collection = %config.users.collection,
        operation_timeout = ?config.users.operation_timeout,
        "Connected to MongoDB"
    );

    let state = AppState {
        config,
        mongo_client,
        db,
    };
    let app = build_app(&state)?;
    let server_config = state.config.server.clone();

    info!(timeout = ?SHUTDOWN_TIMEOUT, "Starting Users API");

    create_production_app(app, &server_config, SHUTDOWN_TIMEOUT, async move {
        info!("Closing MongoDB connections");
        state.mongo_client.shutdown().await;
        info!("MongoDB connections closed");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
