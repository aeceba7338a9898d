//! Configuration management for the fraud detection API

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "FRAUD_API_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub frontend: FrontendConfig,
    pub model_info: ModelInfoConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum upload size for batch prediction, in megabytes
    pub max_upload_mb: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context(format!("Invalid listen address {}:{}", self.host, self.port))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Model artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX classifier
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

/// Static frontend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// HTML document served at `/`
    pub index_path: String,
}

/// Descriptive figures reported by `/api/model-info`.
///
/// These come from the training notebook, not from the loaded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoConfig {
    pub training_accuracy: f64,
    pub test_accuracy: f64,
    pub model_type: String,
    pub classes: Vec<String>,
}

/// Serving metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between metric summaries in the log; 0 disables reporting
    pub report_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default file (if present) and environment
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path.
    ///
    /// Sources, lowest priority first: built-in defaults, the file, then
    /// `FRAUD_API__<SECTION>__<KEY>` environment variables.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("Failed to encode defaults")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("FRAUD_API")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                max_upload_mb: 200,
            },
            model: ModelConfig {
                path: "models/credit_card_model.onnx".to_string(),
                onnx_threads: 1,
            },
            frontend: FrontendConfig {
                index_path: "static/index.html".to_string(),
            },
            model_info: ModelInfoConfig {
                training_accuracy: 0.95,
                test_accuracy: 0.913,
                model_type: "Logistic Regression".to_string(),
                classes: vec!["Legitimate".to_string(), "Fraudulent".to_string()],
            },
            metrics: MetricsConfig {
                report_interval_secs: 60,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.model.path, "models/credit_card_model.onnx");
        assert_eq!(config.model_info.training_accuracy, 0.95);
        assert_eq!(config.model_info.test_accuracy, 0.913);
        assert_eq!(config.model_info.classes, vec!["Legitimate", "Fraudulent"]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from_path("does/not/exist.toml").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[model]
path = "artifacts/fraud.onnx"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.model.path, "artifacts/fraud.onnx");
        assert_eq!(config.model.onnx_threads, 1);
    }

    #[test]
    fn test_socket_addr() {
        let server = AppConfig::default().server;
        assert_eq!(server.socket_addr().unwrap().port(), 5000);
        assert_eq!(server.max_upload_bytes(), 200 * 1024 * 1024);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..server
        };
        assert!(bad.socket_addr().is_err());
    }
}
