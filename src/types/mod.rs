//! Type definitions for the fraud detection API

pub mod batch;
pub mod prediction;
pub mod transaction;

pub use batch::{BatchDataset, CsvUpload};
pub use prediction::{BatchPredictionResult, ClassProbabilities, PredictionResult};
pub use transaction::TransactionRecord;
