//! ONNX model loader

use crate::models::inference::OnnxClassifier;
use crate::models::Classifier;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Loader for the fraud classifier artifact
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load an ONNX classifier from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<OnnxClassifier> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "output_probability".to_string());

        info!(
            model = %name,
            input = %input_name,
            label_output = ?label_output,
            probability_output = %probability_output,
            "Model loaded successfully"
        );

        Ok(OnnxClassifier::new(
            name,
            session,
            input_name,
            label_output,
            probability_output,
        ))
    }

    /// Load the classifier if the artifact is usable.
    ///
    /// A missing or unreadable file leaves the service without a model; the
    /// API keeps running and reports the model as not loaded.
    pub fn load_optional<P: AsRef<Path>>(&self, path: P) -> Option<Arc<dyn Classifier>> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(
                path = %path.display(),
                "Model file not found; export the trained model to ONNX first. Predictions are disabled"
            );
            return None;
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        match self.load_model(path, &name) {
            Ok(model) => Some(Arc::new(model)),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load model; predictions are disabled");
                None
            }
        }
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_not_fatal() {
        let loader = ModelLoader::new();
        let model = loader.load_optional("does/not/exist/credit_card_model.onnx");
        assert!(model.is_none());
    }

    #[test]
    fn test_invalid_model_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();

        let loader = ModelLoader::with_threads(2);
        assert!(loader.load_optional(&path).is_none());
    }

    #[test]
    fn test_thread_count_floor() {
        let loader = ModelLoader::with_threads(0);
        assert_eq!(loader.onnx_threads, 1);
    }
}
