//! Credit Card Fraud Detection API
//!
//! Serves a pre-trained fraud classifier over HTTP: single transactions as
//! JSON, batches as CSV uploads.

pub mod api;
pub mod config;
pub mod error;
pub mod feature_mapper;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod service;
pub mod setup;
pub mod types;

pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use feature_mapper::FeatureMapper;
pub use models::{Classifier, ModelLoader};
pub use service::PredictionService;
pub use types::{transaction::TransactionRecord, PredictionResult};
