//! Feature mapping for fraud model inference.
//!
//! The model was trained on the columns of the public credit card fraud
//! dataset in their original order: `Time`, `V1`..`V28`, `Amount`.

use crate::types::transaction::TransactionRecord;

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 30;

/// Model input for one transaction, in training column order.
pub type FeatureVector = [f32; FEATURE_COUNT];

/// Feature names in the order expected by the model.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Time", "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13",
    "V14", "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26",
    "V27", "V28", "Amount",
];

/// Maps transaction records onto the fixed-order model input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureMapper;

impl FeatureMapper {
    /// Create a new feature mapper.
    pub fn new() -> Self {
        Self
    }

    /// Map a record to its feature vector.
    pub fn map(&self, record: &TransactionRecord) -> FeatureVector {
        let mut features = [0.0_f32; FEATURE_COUNT];

        features[0] = record.time as f32;
        for (slot, value) in features[1..29].iter_mut().zip(record.components()) {
            *slot = value as f32;
        }
        features[29] = record.amount as f32;

        features
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (matching training order).
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }

    /// Position of a feature given a column header, ignoring ASCII case.
    pub fn position(&self, header: &str) -> Option<usize> {
        let header = header.trim();
        FEATURE_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_mapping_order() {
        let mapper = FeatureMapper::new();
        let mut record = TransactionRecord::new(406.0, 149.62);
        record.v1 = -2.31;
        record.v14 = -4.29;
        record.v28 = 0.02;

        let features = mapper.map(&record);

        assert_eq!(features.len(), mapper.feature_count());
        assert_eq!(features[0], 406.0);
        assert_eq!(features[1], -2.31_f32);
        assert_eq!(features[14], -4.29_f32);
        assert_eq!(features[28], 0.02_f32);
        assert_eq!(features[29], 149.62_f32);
    }

    #[test]
    fn test_empty_record_maps_to_zeros() {
        let features = FeatureMapper::new().map(&TransactionRecord::default());
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_feature_names() {
        let mapper = FeatureMapper::new();
        assert_eq!(mapper.feature_names().len(), 30);
        assert_eq!(mapper.feature_names()[0], "Time");
        assert_eq!(mapper.feature_names()[29], "Amount");
    }

    #[test]
    fn test_position_ignores_case() {
        let mapper = FeatureMapper::new();
        assert_eq!(mapper.position("time"), Some(0));
        assert_eq!(mapper.position("v10"), Some(10));
        assert_eq!(mapper.position(" AMOUNT "), Some(29));
        assert_eq!(mapper.position("Class"), None);
    }
}
