//! Fraud Detection API - Main Entry Point
//!
//! Loads the ONNX classifier (if present) and serves predictions over HTTP.

use anyhow::{Context, Result};
use fraud_detection_api::{
    api::{create_router, AppState},
    config::AppConfig,
    logging,
    metrics::MetricsReporter,
    models::ModelLoader,
    service::PredictionService,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    logging::init(&config.logging)?;

    info!("Starting Credit Card Fraud Detection API");
    info!(
        model_path = %config.model.path,
        onnx_threads = config.model.onnx_threads,
        "Configuration loaded"
    );

    // Load the classifier; a missing model is not fatal
    let loader = ModelLoader::with_threads(config.model.onnx_threads);
    let model = loader.load_optional(&config.model.path);
    if model.is_none() {
        warn!("Running without a model: prediction endpoints will return errors");
    }

    let service = PredictionService::new(model);
    let addr = config.server.socket_addr()?;
    let report_interval = config.metrics.report_interval_secs;

    let state = AppState::new(service, config);

    // Periodic metrics summary
    if report_interval > 0 {
        let reporter = MetricsReporter::new(state.metrics.clone(), report_interval);
        tokio::spawn(reporter.start());
    }

    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Open http://{} in your browser", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API shutting down...");
    state.metrics.print_summary();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
