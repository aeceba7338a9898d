//! Prediction results returned to API clients

use serde::{Deserialize, Serialize};

/// Class label for a legitimate transaction
pub const LEGITIMATE: i64 = 0;
/// Class label for a fraudulent transaction
pub const FRAUD: i64 = 1;

/// Probability of each class for one transaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub legitimate: f64,
    pub fraud: f64,
}

impl ClassProbabilities {
    pub fn new(legitimate: f64, fraud: f64) -> Self {
        Self { legitimate, fraud }
    }

    /// Build from a single fraud probability
    pub fn from_fraud(fraud: f64) -> Self {
        Self::new(1.0 - fraud, fraud)
    }

    /// Most likely class
    pub fn label(&self) -> i64 {
        if self.fraud > self.legitimate {
            FRAUD
        } else {
            LEGITIMATE
        }
    }
}

/// Result of classifying one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class (0 = legitimate, 1 = fraud)
    pub prediction: i64,
    /// Whether the transaction was classified as fraud
    pub fraud: bool,
    pub confidence_legitimate: f64,
    pub confidence_fraud: f64,
    /// Human readable verdict
    pub message: String,
}

impl PredictionResult {
    pub fn new(label: i64, probabilities: ClassProbabilities) -> Self {
        let fraud = label == FRAUD;
        let message = if fraud {
            "Fraudulent Transaction"
        } else {
            "Legitimate Transaction"
        };

        Self {
            prediction: label,
            fraud,
            confidence_legitimate: probabilities.legitimate,
            confidence_fraud: probabilities.fraud,
            message: message.to_string(),
        }
    }
}

/// Summary of classifying every row of an uploaded dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictionResult {
    pub total_transactions: usize,
    pub fraud_detected: usize,
    pub legitimate: usize,
    /// Share of rows classified as fraud, in percent, rounded to 2 decimals
    pub fraud_percentage: f64,
    /// Per-row predicted class
    pub predictions: Vec<i64>,
    /// Per-row class probabilities
    pub confidence_scores: Vec<ClassProbabilities>,
    /// Fraction of rows matching the uploaded `Class` column, rounded to 4 decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl BatchPredictionResult {
    /// Aggregate per-row predictions, comparing against ground truth when present
    pub fn summarize(
        predictions: Vec<i64>,
        confidence_scores: Vec<ClassProbabilities>,
        true_labels: Option<&[i64]>,
    ) -> Self {
        let total = predictions.len();
        let fraud_detected = predictions.iter().filter(|&&p| p == FRAUD).count();
        let legitimate = predictions.iter().filter(|&&p| p == LEGITIMATE).count();

        let fraud_percentage = if total > 0 {
            round_to(fraud_detected as f64 / total as f64 * 100.0, 2)
        } else {
            0.0
        };

        let accuracy = true_labels.map(|labels| {
            let matches = labels
                .iter()
                .zip(&predictions)
                .filter(|(truth, predicted)| truth == predicted)
                .count();
            if total > 0 {
                round_to(matches as f64 / total as f64, 4)
            } else {
                0.0
            }
        });

        Self {
            total_transactions: total,
            fraud_detected,
            legitimate,
            fraud_percentage,
            predictions,
            confidence_scores,
            accuracy,
        }
    }
}

/// Round to the given number of decimals, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_result_fraud() {
        let result = PredictionResult::new(FRAUD, ClassProbabilities::new(0.12, 0.88));

        assert_eq!(result.prediction, 1);
        assert!(result.fraud);
        assert_eq!(result.message, "Fraudulent Transaction");
        assert!((result.confidence_legitimate + result.confidence_fraud - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_result_wire_fields() {
        let result = PredictionResult::new(LEGITIMATE, ClassProbabilities::new(0.97, 0.03));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["prediction"], 0);
        assert_eq!(json["fraud"], false);
        assert_eq!(json["confidence_legitimate"], 0.97);
        assert_eq!(json["confidence_fraud"], 0.03);
        assert_eq!(json["message"], "Legitimate Transaction");
    }

    #[test]
    fn test_probabilities_label() {
        assert_eq!(ClassProbabilities::from_fraud(0.7).label(), FRAUD);
        assert_eq!(ClassProbabilities::from_fraud(0.3).label(), LEGITIMATE);
        assert_eq!(ClassProbabilities::from_fraud(0.5).label(), LEGITIMATE);
    }

    #[test]
    fn test_batch_summary_counts() {
        let predictions = vec![0, 1, 0];
        let scores = vec![
            ClassProbabilities::from_fraud(0.1),
            ClassProbabilities::from_fraud(0.9),
            ClassProbabilities::from_fraud(0.2),
        ];

        let summary = BatchPredictionResult::summarize(predictions, scores, None);

        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.fraud_detected, 1);
        assert_eq!(summary.legitimate, 2);
        assert_eq!(
            summary.fraud_detected + summary.legitimate,
            summary.total_transactions
        );
        assert_eq!(summary.fraud_percentage, 33.33);
        assert_eq!(summary.accuracy, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("accuracy").is_none());
        assert_eq!(json["confidence_scores"][1]["fraud"], 0.9);
    }

    #[test]
    fn test_batch_summary_accuracy() {
        let predictions = vec![0, 1, 1, 0, 0, 0];
        let scores = vec![ClassProbabilities::from_fraud(0.0); 6];
        let truth = [0, 1, 0, 0, 1, 0];

        let summary = BatchPredictionResult::summarize(predictions, scores, Some(&truth));

        // 4 of 6 rows match
        assert_eq!(summary.accuracy, Some(0.6667));
        assert_eq!(summary.fraud_percentage, 33.33);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(2.0 / 3.0, 4), 0.6667);
        assert_eq!(round_to(100.0, 2), 100.0);
        // Exact ties go to the even neighbour
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.03125, 4), 0.0312);
        assert_eq!(round_to(0.375, 2), 0.38);
    }

    #[test]
    fn test_batch_summary_rounds_ties_to_even() {
        // 1 fraud in 800 rows is exactly 0.125 percent
        let mut predictions = vec![0; 800];
        predictions[0] = 1;
        let scores = vec![ClassProbabilities::from_fraud(0.0); 800];

        let summary = BatchPredictionResult::summarize(predictions, scores, None);
        assert_eq!(summary.fraud_percentage, 0.12);

        // 1 match in 32 rows is exactly 0.03125
        let predictions = vec![1; 32];
        let mut truth = vec![0; 32];
        truth[0] = 1;
        let scores = vec![ClassProbabilities::from_fraud(1.0); 32];

        let summary = BatchPredictionResult::summarize(predictions, scores, Some(&truth));
        assert_eq!(summary.accuracy, Some(0.0312));
    }
}
