//! AQI predictor server
//!
//! Loads the scaler and model once, then serves predictions over HTTP.
//! Startup fails before the listener is bound if either artifact is unusable.

use anyhow::{Context, Result};
use aqi_lib::{
    health::{components, HealthRegistry},
    observability::{AqiMetrics, StructuredLogger},
    AqiPredictor, ArtifactLoader,
};
use aqi_server::{
    api,
    config::{LogFormat, ServerConfig},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_NAME: &str = "aqi-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load()?;

    // Initialize tracing with env filter, falling back to the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }

    info!("Starting {}", SERVICE_NAME);
    let logger = StructuredLogger::new(SERVICE_NAME);

    let artifacts = match ArtifactLoader::new(config.artifacts.clone()).load() {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!(error = %e, "Failed to load artifacts");
            return Err(e).context("Cannot start without a usable scaler and model");
        }
    };
    logger.log_artifacts_loaded(
        &config.artifacts.scaler_path.display().to_string(),
        artifacts.scaler.kind(),
        &config.artifacts.model_path.display().to_string(),
        artifacts.model.kind(),
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::ARTIFACTS).await;
    health_registry.register(components::PREDICTOR).await;

    let metrics = AqiMetrics::new();
    metrics.set_artifact_info(artifacts.scaler.kind(), artifacts.model.kind());

    let state = Arc::new(api::AppState::new(
        AqiPredictor::new(artifacts),
        health_registry.clone(),
        metrics,
        logger.clone(),
    ));

    health_registry.set_ready(true).await;

    let addr = config.listen_addr();
    logger.log_startup(SERVER_VERSION, &addr);

    let shutdown_logger = logger.clone();
    let shutdown_state = state.clone();
    api::serve(&addr, state, async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        shutdown_logger.log_shutdown("SIGINT received", &shutdown_state.predictor.stats());
    })
    .await?;

    info!("Shutting down");
    Ok(())
}
