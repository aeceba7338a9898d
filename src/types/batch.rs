//! Batch uploads: CSV validation and parsing

use crate::error::{AppError, AppResult};
use crate::feature_mapper::{FeatureMapper, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use std::path::Path;
use tracing::{debug, warn};

/// Name of the optional ground-truth column
pub const LABEL_COLUMN: &str = "Class";

/// A file received by the batch endpoint
#[derive(Debug, Clone)]
pub struct CsvUpload {
    pub filename: String,
    pub contents: Vec<u8>,
}

impl CsvUpload {
    pub fn new(filename: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            contents: contents.into(),
        }
    }

    /// Check the filename before anything is parsed
    pub fn validate(&self) -> AppResult<()> {
        if self.filename.trim().is_empty() {
            return Err(AppError::invalid_input("Empty filename"));
        }

        let is_csv = Path::new(&self.filename)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if !is_csv {
            return Err(AppError::invalid_input("File must be CSV format"));
        }

        Ok(())
    }
}

/// Rows of an uploaded dataset mapped to model input
#[derive(Debug, Clone, Default)]
pub struct BatchDataset {
    /// Feature vectors in upload order
    pub rows: Vec<FeatureVector>,
    /// Ground-truth labels, present when the upload carried a `Class` column
    pub labels: Option<Vec<i64>>,
}

impl BatchDataset {
    /// Parse CSV bytes with a header row.
    ///
    /// Feature columns are located by header name, so their order in the file
    /// does not matter. Columns that are neither features nor `Class` are ignored.
    pub fn from_csv(data: &[u8]) -> AppResult<Self> {
        let mapper = FeatureMapper::new();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers = reader
            .headers()
            .map_err(|e| AppError::invalid_input(format!("Failed to read CSV header: {}", e)))?
            .clone();

        let mut columns: [Option<usize>; FEATURE_COUNT] = [None; FEATURE_COUNT];
        let mut label_column = None;
        let mut ignored = Vec::new();

        for (index, header) in headers.iter().enumerate() {
            if header.eq_ignore_ascii_case(LABEL_COLUMN) {
                label_column = Some(index);
            } else if let Some(position) = mapper.position(header) {
                columns[position] = Some(index);
            } else {
                ignored.push(header.to_string());
            }
        }

        let missing: Vec<&str> = columns
            .iter()
            .zip(FEATURE_NAMES)
            .filter(|(column, _)| column.is_none())
            .map(|(_, name)| name)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::invalid_input(format!(
                "CSV is missing required columns: {}",
                missing.join(", ")
            )));
        }

        if !ignored.is_empty() {
            warn!(columns = ?ignored, "Ignoring unknown CSV columns");
        }

        let mut rows = Vec::new();
        let mut labels = label_column.map(|_| Vec::new());

        for (line, record) in reader.records().enumerate() {
            // Header is row 1
            let row_number = line + 2;
            let record = record.map_err(|e| {
                AppError::invalid_input(format!("Malformed CSV at row {}: {}", row_number, e))
            })?;

            let mut features = [0.0_f32; FEATURE_COUNT];
            for (position, column) in columns.iter().enumerate() {
                let cell = column.and_then(|c| record.get(c)).unwrap_or_default();
                features[position] = cell.parse::<f32>().map_err(|_| {
                    AppError::invalid_input(format!(
                        "Invalid value '{}' for column {} at row {}",
                        cell, FEATURE_NAMES[position], row_number
                    ))
                })?;
            }
            rows.push(features);

            if let (Some(column), Some(labels)) = (label_column, labels.as_mut()) {
                let cell = record.get(column).unwrap_or_default();
                labels.push(parse_label(cell).ok_or_else(|| {
                    AppError::invalid_input(format!(
                        "Invalid value '{}' for column {} at row {}",
                        cell, LABEL_COLUMN, row_number
                    ))
                })?);
            }
        }

        if rows.is_empty() {
            return Err(AppError::invalid_input("CSV file contains no transactions"));
        }

        debug!(
            rows = rows.len(),
            labelled = labels.is_some(),
            "Parsed batch dataset"
        );

        Ok(Self { rows, labels })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Labels may be written as integers or floats ("1", "1.0")
fn parse_label(cell: &str) -> Option<i64> {
    cell.parse::<i64>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
    })
}
