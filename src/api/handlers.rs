//! HTTP handlers

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    response::Html,
    Json,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, warn};

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::types::batch::CsvUpload;
use crate::types::prediction::{BatchPredictionResult, PredictionResult};
use crate::types::transaction::TransactionRecord;

/// Page served when the configured frontend document is missing
const BUILTIN_INDEX: &str = include_str!("../../static/index.html");

/// Multipart field carrying the CSV upload
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model_loaded: bool,
    pub training_accuracy: f64,
    pub test_accuracy: f64,
    pub model_type: String,
    pub features_count: usize,
    pub classes: Vec<String>,
}

/// Serve the HTML frontend
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let path = &state.config.frontend.index_path;
    match tokio::fs::read_to_string(path).await {
        Ok(page) => Html(page),
        Err(e) => {
            debug!(path = %path, error = %e, "Frontend document unavailable, serving built-in page");
            Html(BUILTIN_INDEX.to_string())
        }
    }
}

/// Make a prediction for a single transaction
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<TransactionRecord>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let started = Instant::now();

    let result = match payload {
        Ok(Json(record)) => state.service.predict_one(&record),
        Err(_) if !state.service.is_model_loaded() => Err(AppError::ModelUnavailable),
        Err(rejection) => Err(AppError::from(rejection)),
    };

    match result {
        Ok(prediction) => {
            state
                .metrics
                .record_single(started.elapsed(), prediction.fraud);
            Ok(Json(prediction))
        }
        Err(e) => {
            state.metrics.record_failure();
            Err(e)
        }
    }
}

/// Process a CSV file and predict fraud for all transactions
pub async fn predict_batch(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<BatchPredictionResult>> {
    let started = Instant::now();

    // A body that is not multipart carries no file
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => {
            debug!(error = %rejection, "Batch request without multipart body");
            Ok(None)
        }
    };

    let result = match upload {
        Ok(upload) => state.service.predict_batch(upload),
        // Without a model the upload is irrelevant
        Err(_) if !state.service.is_model_loaded() => Err(AppError::ModelUnavailable),
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => {
            state.metrics.record_batch(
                started.elapsed(),
                summary.total_transactions,
                summary.fraud_detected,
            );
            Ok(Json(summary))
        }
        Err(e) => {
            state.metrics.record_failure();
            Err(e)
        }
    }
}

/// Get information about the model
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    let info = &state.config.model_info;

    Json(ModelInfo {
        model_loaded: state.service.is_model_loaded(),
        training_accuracy: info.training_accuracy,
        test_accuracy: info.test_accuracy,
        model_type: info.model_type.clone(),
        features_count: state.service.mapper().feature_count(),
        classes: info.classes.clone(),
    })
}

/// Pull the `file` field out of a multipart body, if there is one
async fn read_upload(mut multipart: Multipart) -> AppResult<Option<CsvUpload>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            warn!(field = ?field.name(), "Ignoring unexpected form field");
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let contents = field.bytes().await?;

        debug!(file = %filename, bytes = contents.len(), "Received upload");
        return Ok(Some(CsvUpload::new(filename, contents.to_vec())));
    }

    Ok(None)
}
