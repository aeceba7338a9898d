//! Sample Batch Generator
//!
//! Writes a synthetic CSV in the batch upload format (Time, V1..V28, Amount,
//! Class) for exercising `/api/predict-batch`.
//!
//! Usage: sample-batch [path] [rows] [fraud_rate]

use fraud_detection_api::feature_mapper::{FEATURE_COUNT, FEATURE_NAMES};
use fraud_detection_api::types::batch::LABEL_COLUMN;
use rand::Rng;
use tracing::info;

/// Random transaction generator for testing
struct TransactionGenerator {
    rng: rand::rngs::ThreadRng,
    elapsed: f64,
}

impl TransactionGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            elapsed: 0.0,
        }
    }

    fn advance_clock(&mut self) -> f64 {
        self.elapsed += self.rng.gen_range(0.0..120.0_f64).floor();
        self.elapsed
    }

    /// Generate a typical legitimate transaction
    fn generate_legitimate(&mut self) -> Vec<String> {
        let mut cells = vec![self.advance_clock().to_string()];
        for _ in 0..28 {
            cells.push(format!("{:.6}", self.rng.gen_range(-1.5..1.5)));
        }
        cells.push(format!("{:.2}", self.rng.gen_range(1.0..250.0)));
        cells.push("0".to_string());
        cells
    }

    /// Generate a transaction shaped like the fraud class (strongly negative V14/V12/V10)
    fn generate_suspicious(&mut self) -> Vec<String> {
        let mut cells = vec![self.advance_clock().to_string()];
        for component in 1..=28 {
            let value: f64 = match component {
                10 | 12 | 14 | 17 => self.rng.gen_range(-12.0..-4.0),
                4 | 11 => self.rng.gen_range(3.0..8.0),
                _ => self.rng.gen_range(-3.0..3.0),
            };
            cells.push(format!("{:.6}", value));
        }
        cells.push(format!("{:.2}", self.rng.gen_range(0.0..2000.0)));
        cells.push("1".to_string());
        cells
    }
}

/// Share of suspicious rows when none (or no usable value) is given
const DEFAULT_FRAUD_RATE: f64 = 0.1;

/// Parse the fraud rate argument into a probability in [0, 1]
fn parse_fraud_rate(arg: Option<&str>) -> f64 {
    arg.and_then(|s| s.parse::<f64>().ok())
        .filter(|rate| rate.is_finite())
        .unwrap_or(DEFAULT_FRAUD_RATE)
        .clamp(0.0, 1.0)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_batch=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let path = args.get(1).map(|s| s.as_str()).unwrap_or("sample_batch.csv");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let fraud_rate = parse_fraud_rate(args.get(3).map(|s| s.as_str()));

    info!(path = %path, count = count, fraud_rate = fraud_rate, "Generating sample batch");

    let mut writer = csv::Writer::from_path(path)?;
    let mut header: Vec<&str> = FEATURE_NAMES.to_vec();
    header.push(LABEL_COLUMN);
    writer.write_record(&header)?;

    let mut generator = TransactionGenerator::new();
    let mut rng = rand::thread_rng();
    let mut suspicious_count = 0;

    for _ in 0..count {
        let row = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            generator.generate_legitimate()
        };
        debug_assert_eq!(row.len(), FEATURE_COUNT + 1);
        writer.write_record(&row)?;
    }

    writer.flush()?;

    info!(
        "Wrote {} transactions ({} legitimate, {} suspicious) to {}",
        count,
        count - suspicious_count,
        suspicious_count,
        path
    );

    Ok(())
}
