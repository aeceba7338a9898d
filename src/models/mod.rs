//! ML model inference components

pub mod inference;
pub mod loader;

pub use inference::OnnxClassifier;
pub use loader::ModelLoader;

use crate::feature_mapper::FeatureVector;
use crate::types::prediction::ClassProbabilities;
use anyhow::Result;

/// A trained binary classifier.
///
/// Both operations take a batch of rows and return one entry per row.
pub trait Classifier: Send + Sync {
    /// Model name used in logs
    fn name(&self) -> &str;

    /// Predicted class label per row
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<i64>>;

    /// Class probabilities per row
    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<ClassProbabilities>>;

    /// Labels and probabilities together. Models that produce both from a
    /// single evaluation should override this.
    fn classify(&self, rows: &[FeatureVector]) -> Result<(Vec<i64>, Vec<ClassProbabilities>)> {
        Ok((self.predict(rows)?, self.predict_proba(rows)?))
    }
}
