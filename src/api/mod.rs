//! HTTP surface
//!
//! ```text
//! GET  /                  static frontend
//! POST /api/predict       single transaction (JSON)
//! POST /api/predict-batch CSV upload (multipart field "file")
//! GET  /api/model-info    descriptive model metadata
//! ```

pub mod handlers;

use crate::config::AppConfig;
use crate::metrics::ServingMetrics;
use crate::service::PredictionService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub config: Arc<AppConfig>,
    pub metrics: Arc<ServingMetrics>,
}

impl AppState {
    pub fn new(service: PredictionService, config: AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
            metrics: Arc::new(ServingMetrics::new()),
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.server.max_upload_bytes();

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/predict", post(handlers::predict))
        .route("/api/predict-batch", post(handlers::predict_batch))
        .route("/api/model-info", get(handlers::model_info))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
