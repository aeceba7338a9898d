//! Setup Checker
//!
//! Verifies that the configuration, frontend, sample data, model artifact and
//! ONNX Runtime are in place. Always exits successfully.
//!
//! Usage: check-setup [project_dir]

use fraud_detection_api::config::AppConfig;
use fraud_detection_api::setup::{check_onnx_runtime, SetupChecker};
use std::path::PathBuf;

fn main() {
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = match AppConfig::load_from_path(root.join("config/config.toml")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not read configuration ({:#}), using defaults", e);
            AppConfig::default()
        }
    };

    let report = SetupChecker::new(root, config).run(check_onnx_runtime);
    print!("{}", report.render());
}
