//! Setup diagnostics: checks that the files and runtime the API needs are in place.
//!
//! Nothing here fails; every problem ends up in the report.

use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};
use std::path::{Path, PathBuf};

/// Sample dataset the model was trained on, used for batch uploads
pub const SAMPLE_DATASET: &str = "creditcard.csv";

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: Option<String>,
}

impl Check {
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: true,
            detail: None,
        }
    }

    pub fn failed(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: false,
            detail: Some(detail.into()),
        }
    }

    /// Check that a file exists under `root`
    pub fn file(root: &Path, relative: &str) -> Self {
        if root.join(relative).is_file() {
            Self::passed(relative)
        } else {
            Self::failed(relative, "missing")
        }
    }

    fn line(&self) -> String {
        let mark = if self.ok { "✓" } else { "✗" };
        match &self.detail {
            Some(detail) => format!("  {} {} ({})", mark, self.name, detail),
            None => format!("  {} {}", mark, self.name),
        }
    }
}

/// Overall verdict, in order of precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStatus {
    Ready,
    ModelMissing,
    RuntimeMissing,
    FilesMissing,
}

/// Everything the checker found
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub files: Vec<Check>,
    pub model: Check,
    pub runtime: Vec<Check>,
    pub model_path: String,
}

impl SetupReport {
    fn files_ok(&self) -> bool {
        self.files.iter().all(|c| c.ok)
    }

    fn runtime_ok(&self) -> bool {
        self.runtime.iter().all(|c| c.ok)
    }

    pub fn status(&self) -> SetupStatus {
        match (self.files_ok(), self.runtime_ok(), self.model.ok) {
            (true, true, true) => SetupStatus::Ready,
            (true, true, false) => SetupStatus::ModelMissing,
            (_, false, _) => SetupStatus::RuntimeMissing,
            (false, true, _) => SetupStatus::FilesMissing,
        }
    }

    /// Console checklist followed by remediation steps
    pub fn render(&self) -> String {
        let rule = "=".repeat(50);
        let mut lines = vec![
            String::new(),
            rule.clone(),
            "Credit Card Fraud Detection - Setup Checker".to_string(),
            rule.clone(),
            String::new(),
            "Checking files...".to_string(),
        ];

        lines.extend(self.files.iter().map(Check::line));
        lines.push(self.model.line());

        lines.push(String::new());
        lines.push("Checking runtime components...".to_string());
        if self.runtime.is_empty() {
            lines.push("  - skipped (no model file to load)".to_string());
        }
        lines.extend(self.runtime.iter().map(Check::line));

        lines.push(String::new());
        lines.push(rule.clone());
        lines.push("SETUP STATUS".to_string());
        lines.push(rule.clone());
        lines.push(String::new());

        match self.status() {
            SetupStatus::Ready => {
                lines.push("Everything is ready! Run: cargo run --release".to_string());
            }
            SetupStatus::ModelMissing => {
                lines.push("Files OK".to_string());
                lines.push(format!("Model not found: {}", self.model_path));
                lines.push(String::new());
                lines.push("Action needed:".to_string());
                lines.push("   1. Train the classifier in the notebook".to_string());
                lines.push("   2. Export it to ONNX (e.g. skl2onnx, input float [N, 30])".to_string());
                lines.push(format!("   3. Save it as {}", self.model_path));
                lines.push("   4. Then run: cargo run --release".to_string());
            }
            SetupStatus::RuntimeMissing => {
                lines.push(format!("ONNX Runtime could not load {}", self.model_path));
                lines.push(String::new());
                lines.push("Action needed:".to_string());
                lines.push("   Re-export the model if the file is damaged or not ONNX".to_string());
                lines.push(
                    "   With a dynamically linked runtime, point ORT_DYLIB_PATH at libonnxruntime"
                        .to_string(),
                );
                lines.push("   Then run this checker again".to_string());
            }
            SetupStatus::FilesMissing => {
                lines.push("Some files are missing!".to_string());
                lines.push("Run the checker from the project root".to_string());
            }
        }

        lines.push(String::new());
        lines.push(rule);
        lines.push(String::new());

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Runs the checks against a project directory
pub struct SetupChecker {
    root: PathBuf,
    config: AppConfig,
}

impl SetupChecker {
    pub fn new(root: impl Into<PathBuf>, config: AppConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Check files, then hand the model path to `check_runtime`, which reports
    /// runtime component checks.
    pub fn run<F>(&self, check_runtime: F) -> SetupReport
    where
        F: FnOnce(&Path) -> Vec<Check>,
    {
        let files = vec![
            Check::file(&self.root, DEFAULT_CONFIG_PATH),
            Check::file(&self.root, &self.config.frontend.index_path),
            Check::file(&self.root, SAMPLE_DATASET),
        ];

        let model_path = self.root.join(&self.config.model.path);
        let model = Check::file(&self.root, &self.config.model.path);
        let runtime = check_runtime(&model_path);

        SetupReport {
            files,
            model,
            runtime,
            model_path: self.config.model.path.clone(),
        }
    }
}

/// Load the model with ONNX Runtime, if the file is there.
///
/// A successful load is the only reliable sign the runtime works: with the
/// default statically linked build a bare session builder always succeeds.
pub fn check_onnx_runtime(model_path: &Path) -> Vec<Check> {
    if !model_path.is_file() {
        return Vec::new();
    }

    let loader = crate::models::ModelLoader::new();
    let check = match loader.load_model(model_path, "setup_check") {
        Ok(_) => Check::passed("model graph"),
        Err(e) => Check::failed("model graph", format!("{:#}", e)),
    };

    vec![check]
}
