//! Prediction service: runs the loaded classifier on single records and batches

use crate::error::{AppError, AppResult};
use crate::feature_mapper::{FeatureMapper, FeatureVector};
use crate::models::Classifier;
use crate::types::batch::{BatchDataset, CsvUpload};
use crate::types::prediction::{
    BatchPredictionResult, ClassProbabilities, PredictionResult, FRAUD, LEGITIMATE,
};
use crate::types::transaction::TransactionRecord;
use std::sync::Arc;
use tracing::{debug, info};

/// Holds the classifier loaded at startup. Immutable once built.
pub struct PredictionService {
    model: Option<Arc<dyn Classifier>>,
    mapper: FeatureMapper,
}

impl PredictionService {
    /// Create a service; `None` runs in degraded mode where every prediction fails
    pub fn new(model: Option<Arc<dyn Classifier>>) -> Self {
        Self {
            model,
            mapper: FeatureMapper::new(),
        }
    }

    /// Whether a model was loaded
    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn mapper(&self) -> &FeatureMapper {
        &self.mapper
    }

    fn model(&self) -> AppResult<&dyn Classifier> {
        self.model.as_deref().ok_or(AppError::ModelUnavailable)
    }

    /// Classify a single transaction
    pub fn predict_one(&self, record: &TransactionRecord) -> AppResult<PredictionResult> {
        let model = self.model()?;
        let features = self.mapper.map(record);

        let (labels, probabilities) = classify(model, std::slice::from_ref(&features))?;

        let result = PredictionResult::new(labels[0], probabilities[0]);
        debug!(
            model = %model.name(),
            prediction = result.prediction,
            confidence_fraud = result.confidence_fraud,
            "Single prediction"
        );

        Ok(result)
    }

    /// Classify every row of an uploaded CSV.
    ///
    /// The upload is validated and parsed before the model is invoked.
    pub fn predict_batch(&self, upload: Option<CsvUpload>) -> AppResult<BatchPredictionResult> {
        let model = self.model()?;

        let upload = upload.ok_or_else(|| AppError::invalid_input("No file provided"))?;
        upload.validate()?;

        let dataset = BatchDataset::from_csv(&upload.contents)?;
        let (predictions, confidence_scores) = classify(model, &dataset.rows)?;

        let result = BatchPredictionResult::summarize(
            predictions,
            confidence_scores,
            dataset.labels.as_deref(),
        );

        info!(
            file = %upload.filename,
            total = result.total_transactions,
            fraud_detected = result.fraud_detected,
            accuracy = ?result.accuracy,
            "Batch prediction complete"
        );

        Ok(result)
    }
}

/// Run the model once and check the outputs line up with the input
fn classify(
    model: &dyn Classifier,
    rows: &[FeatureVector],
) -> AppResult<(Vec<i64>, Vec<ClassProbabilities>)> {
    let (labels, probabilities) = model.classify(rows)?;

    if labels.len() != rows.len() || probabilities.len() != rows.len() {
        return Err(AppError::Unhandled(format!(
            "Model {} returned {} labels and {} probability rows for {} inputs",
            model.name(),
            labels.len(),
            probabilities.len(),
            rows.len()
        )));
    }

    if let Some(label) = labels.iter().find(|&&l| l != LEGITIMATE && l != FRAUD) {
        return Err(AppError::Unhandled(format!(
            "Model {} returned unexpected class label {}",
            model.name(),
            label
        )));
    }

    Ok((labels, probabilities))
}
