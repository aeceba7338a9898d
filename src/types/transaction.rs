//! Transaction record accepted by the single-prediction endpoint

use serde::{Deserialize, Serialize};

/// A card transaction described by the anonymised features of the
/// credit card fraud dataset.
///
/// Every field is optional on the wire and defaults to zero, so a partial
/// record still produces a full feature vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionRecord {
    /// Seconds elapsed since the first transaction in the dataset
    #[serde(alias = "Time")]
    pub time: f64,

    /// PCA components V1..V28
    #[serde(alias = "V1")]
    pub v1: f64,
    #[serde(alias = "V2")]
    pub v2: f64,
    #[serde(alias = "V3")]
    pub v3: f64,
    #[serde(alias = "V4")]
    pub v4: f64,
    #[serde(alias = "V5")]
    pub v5: f64,
    #[serde(alias = "V6")]
    pub v6: f64,
    #[serde(alias = "V7")]
    pub v7: f64,
    #[serde(alias = "V8")]
    pub v8: f64,
    #[serde(alias = "V9")]
    pub v9: f64,
    #[serde(alias = "V10")]
    pub v10: f64,
    #[serde(alias = "V11")]
    pub v11: f64,
    #[serde(alias = "V12")]
    pub v12: f64,
    #[serde(alias = "V13")]
    pub v13: f64,
    #[serde(alias = "V14")]
    pub v14: f64,
    #[serde(alias = "V15")]
    pub v15: f64,
    #[serde(alias = "V16")]
    pub v16: f64,
    #[serde(alias = "V17")]
    pub v17: f64,
    #[serde(alias = "V18")]
    pub v18: f64,
    #[serde(alias = "V19")]
    pub v19: f64,
    #[serde(alias = "V20")]
    pub v20: f64,
    #[serde(alias = "V21")]
    pub v21: f64,
    #[serde(alias = "V22")]
    pub v22: f64,
    #[serde(alias = "V23")]
    pub v23: f64,
    #[serde(alias = "V24")]
    pub v24: f64,
    #[serde(alias = "V25")]
    pub v25: f64,
    #[serde(alias = "V26")]
    pub v26: f64,
    #[serde(alias = "V27")]
    pub v27: f64,
    #[serde(alias = "V28")]
    pub v28: f64,

    /// Transaction amount
    #[serde(alias = "Amount")]
    pub amount: f64,
}

impl TransactionRecord {
    /// Create a record with the given time and amount; all PCA components are zero
    pub fn new(time: f64, amount: f64) -> Self {
        Self {
            time,
            amount,
            ..Self::default()
        }
    }

    /// PCA components in order V1..V28
    pub fn components(&self) -> [f64; 28] {
        [
            self.v1, self.v2, self.v3, self.v4, self.v5, self.v6, self.v7, self.v8, self.v9,
            self.v10, self.v11, self.v12, self.v13, self.v14, self.v15, self.v16, self.v17,
            self.v18, self.v19, self.v20, self.v21, self.v22, self.v23, self.v24, self.v25,
            self.v26, self.v27, self.v28,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{"time": 406.0, "v3": -1.5, "amount": 149.62}"#).unwrap();

        assert_eq!(record.time, 406.0);
        assert_eq!(record.v3, -1.5);
        assert_eq!(record.amount, 149.62);
        assert_eq!(record.v1, 0.0);
        assert_eq!(record.v28, 0.0);
    }

    #[test]
    fn test_empty_object_is_all_zero() {
        let record: TransactionRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, TransactionRecord::default());
    }

    #[test]
    fn test_dataset_column_names_accepted() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{"Time": 1.0, "V28": 2.0, "Amount": 3.0}"#).unwrap();

        assert_eq!(record.time, 1.0);
        assert_eq!(record.v28, 2.0);
        assert_eq!(record.amount, 3.0);
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let result = serde_json::from_str::<TransactionRecord>(r#"{"v1": "abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_components_order() {
        let mut record = TransactionRecord::new(10.0, 20.0);
        record.v1 = 1.0;
        record.v28 = 28.0;

        let components = record.components();
        assert_eq!(components[0], 1.0);
        assert_eq!(components[27], 28.0);
    }
}
