//! ONNX Runtime backed fraud classifier

use crate::feature_mapper::{FeatureVector, FEATURE_COUNT};
use crate::models::Classifier;
use crate::types::prediction::ClassProbabilities;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::session::{Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// Classifier exported from the training notebook (e.g. via skl2onnx).
///
/// Expects a `float [N, 30]` input and produces a label output plus a
/// probability output, either as a `[N, 2]` tensor or as ZipMap
/// `seq(map(int64, float))`.
pub struct OnnxClassifier {
    name: String,
    /// Runs need exclusive access to the session
    session: Mutex<Session>,
    input_name: String,
    label_output: Option<String>,
    probability_output: String,
}

impl OnnxClassifier {
    pub fn new(
        name: &str,
        session: Session,
        input_name: String,
        label_output: Option<String>,
        probability_output: String,
    ) -> Self {
        Self {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
        }
    }

    /// Run the graph once, returning labels and probabilities for every row
    fn run(&self, rows: &[FeatureVector]) -> Result<(Vec<i64>, Vec<ClassProbabilities>)> {
        if rows.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        // Prepare input tensor - shape [rows, 30]
        let shape = vec![rows.len() as i64, FEATURE_COUNT as i64];
        let data: Vec<f32> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        let input_tensor =
            Tensor::from_array((shape, data)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .context("ONNX inference failed")?;

        let probabilities = self.extract_probabilities(&outputs, rows.len())?;

        let labels = match self.label_output.as_deref().and_then(|n| outputs.get(n)) {
            Some(output) => {
                let (_, data) = output
                    .try_extract_tensor::<i64>()
                    .context("Failed to read label output")?;
                data.to_vec()
            }
            // No label output: take the most likely class
            None => probabilities.iter().map(ClassProbabilities::label).collect(),
        };

        if labels.len() != rows.len() {
            anyhow::bail!(
                "Model returned {} labels for {} rows",
                labels.len(),
                rows.len()
            );
        }

        debug!(
            model = %self.name,
            rows = rows.len(),
            "ONNX inference complete"
        );

        Ok((labels, probabilities))
    }

    /// Extract class probabilities from the probability output.
    /// Handles both tensor outputs and seq(map) outputs (ZipMap)
    fn extract_probabilities(
        &self,
        outputs: &SessionOutputs,
        rows: usize,
    ) -> Result<Vec<ClassProbabilities>> {
        let output = outputs
            .get(self.probability_output.as_str())
            .context(format!(
                "Model has no output named {}",
                self.probability_output
            ))?;

        let dtype = output.dtype();

        // Try tensor format first (zipmap disabled)
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return probabilities_from_tensor(&dims, data, rows);
        }

        // Try sequence format - seq(map(int64, float))
        if DynSequenceValueType::can_downcast(dtype) {
            return self.extract_from_sequence_map(output, rows);
        }

        anyhow::bail!(
            "Unsupported probability output type for model {}",
            self.name
        )
    }

    /// Extract probabilities from seq(map(int64, float)) format
    fn extract_from_sequence_map(
        &self,
        output: &DynValue,
        rows: usize,
    ) -> Result<Vec<ClassProbabilities>> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

        // One map per row
        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

        if maps.len() != rows {
            anyhow::bail!("Model returned {} probability maps for {} rows", maps.len(), rows);
        }

        maps.iter()
            .map(|map_value| {
                let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;
                probabilities_from_pairs(&kv_pairs)
            })
            .collect()
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<i64>> {
        self.run(rows).map(|(labels, _)| labels)
    }

    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<ClassProbabilities>> {
        self.run(rows).map(|(_, probabilities)| probabilities)
    }

    fn classify(&self, rows: &[FeatureVector]) -> Result<(Vec<i64>, Vec<ClassProbabilities>)> {
        self.run(rows)
    }
}

/// Split a probability tensor into per-row class probabilities.
///
/// `[rows, 2]` holds both classes, `[rows, 1]` or `[rows]` holds the fraud
/// probability only.
fn probabilities_from_tensor(
    dims: &[i64],
    data: &[f32],
    rows: usize,
) -> Result<Vec<ClassProbabilities>> {
    let width = match dims {
        [n, classes] if *n as usize == rows => *classes as usize,
        [n] if *n as usize == rows => 1,
        _ => anyhow::bail!(
            "Unexpected probability tensor shape {:?} for {} rows",
            dims,
            rows
        ),
    };

    if width == 0 || data.len() != rows * width {
        anyhow::bail!(
            "Probability tensor holds {} values, expected {}",
            data.len(),
            rows * width
        );
    }

    Ok(data
        .chunks(width)
        .map(|chunk| {
            if width >= 2 {
                ClassProbabilities::new(chunk[0] as f64, chunk[1] as f64)
            } else {
                ClassProbabilities::from_fraud(chunk[0] as f64)
            }
        })
        .collect())
}

/// Build class probabilities from ZipMap (class id, probability) pairs
fn probabilities_from_pairs(pairs: &[(i64, f32)]) -> Result<ClassProbabilities> {
    let find = |class: i64| {
        pairs
            .iter()
            .find(|(class_id, _)| *class_id == class)
            .map(|(_, prob)| *prob as f64)
    };

    match (find(0), find(1)) {
        (Some(legitimate), Some(fraud)) => Ok(ClassProbabilities::new(legitimate, fraud)),
        (None, Some(fraud)) => Ok(ClassProbabilities::from_fraud(fraud)),
        (Some(legitimate), None) => Ok(ClassProbabilities::new(legitimate, 1.0 - legitimate)),
        (None, None) => Err(anyhow::anyhow!("No probability found in map")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_class_tensor() {
        let probs = probabilities_from_tensor(&[2, 2], &[0.9, 0.1, 0.25, 0.75], 2).unwrap();

        assert_eq!(probs.len(), 2);
        assert!((probs[0].legitimate - 0.9).abs() < 1e-6);
        assert!((probs[1].fraud - 0.75).abs() < 1e-6);
        assert_eq!(probs[1].label(), 1);
    }

    #[test]
    fn test_single_column_tensor() {
        let probs = probabilities_from_tensor(&[1, 1], &[0.2], 1).unwrap();
        assert!((probs[0].fraud - 0.2).abs() < 1e-6);
        assert!((probs[0].legitimate - 0.8).abs() < 1e-6);

        let probs = probabilities_from_tensor(&[3], &[0.1, 0.6, 0.3], 3).unwrap();
        assert_eq!(probs.len(), 3);
        assert_eq!(probs[1].label(), 1);
    }

    #[test]
    fn test_tensor_shape_mismatch() {
        assert!(probabilities_from_tensor(&[3, 2], &[0.5; 6], 2).is_err());
        assert!(probabilities_from_tensor(&[2, 2], &[0.5; 3], 2).is_err());
        assert!(probabilities_from_tensor(&[1, 2, 2], &[0.5; 4], 1).is_err());
    }

    #[test]
    fn test_zipmap_pairs() {
        let probs = probabilities_from_pairs(&[(0, 0.3), (1, 0.7)]).unwrap();
        assert!((probs.legitimate - 0.3).abs() < 1e-6);
        assert!((probs.fraud - 0.7).abs() < 1e-6);

        let probs = probabilities_from_pairs(&[(1, 0.4)]).unwrap();
        assert!((probs.legitimate - 0.6).abs() < 1e-6);

        assert!(probabilities_from_pairs(&[(7, 1.0)]).is_err());
    }
}
