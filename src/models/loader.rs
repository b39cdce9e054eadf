//! Startup loader for the model artifacts

use crate::config::ArtifactsConfig;
use crate::models::classifier::{Classifier, LogisticClassifier};
use crate::models::encoder::LabelEncoder;
use crate::models::onnx::OnnxClassifier;
use crate::models::scaler::StandardScaler;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{info, warn};

/// Everything the handlers need from disk. Any artifact may be absent,
/// in which case the endpoints depending on it answer 503.
#[derive(Default)]
pub struct Artifacts {
    pub classifier: Option<Box<dyn Classifier>>,
    pub scaler: Option<StandardScaler>,
    pub label_encoder: Option<LabelEncoder>,
}

impl Artifacts {
    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn scaler_loaded(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn label_encoder_loaded(&self) -> bool {
        self.label_encoder.is_some()
    }

    /// True when every artifact is present
    pub fn is_complete(&self) -> bool {
        self.model_loaded() && self.scaler_loaded() && self.label_encoder_loaded()
    }
}

/// Loader for the classifier, scaler and label encoder
pub struct ArtifactLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ArtifactLoader {
    /// Create a loader with default settings (1 ONNX thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a loader with the given ONNX intra-op thread count
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load every configured artifact. Never fails: problems are logged and
    /// the affected artifact is left unset.
    pub fn load_all(&self, config: &ArtifactsConfig) -> Artifacts {
        let artifacts = Artifacts {
            classifier: load_optional("model", &config.model_path, |p| self.load_classifier(p)),
            scaler: load_optional("scaler", &config.scaler_path, |p| StandardScaler::from_file(p)),
            label_encoder: load_optional(
                "label_encoder",
                &config.label_encoder_path,
                |p| LabelEncoder::from_file(p),
            ),
        };

        if let Some(encoder) = &artifacts.label_encoder {
            info!(neighbourhoods = encoder.class_count(), "Neighbourhood catalog ready");
        }

        if artifacts.is_complete() {
            info!("All model artifacts loaded");
        } else {
            warn!(
                model_loaded = artifacts.model_loaded(),
                scaler_loaded = artifacts.scaler_loaded(),
                label_encoder_loaded = artifacts.label_encoder_loaded(),
                "Running in degraded mode"
            );
        }

        artifacts
    }

    /// Load a classifier, picking the backend from the file extension
    pub fn load_classifier<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn Classifier>> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Box::new(LogisticClassifier::from_file(path)?)),
            _ => Ok(Box::new(self.load_onnx(path)?)),
        }
    }

    /// Load an ONNX classifier from file
    pub fn load_onnx<P: AsRef<Path>>(&self, path: P) -> Result<OnnxClassifier> {
        let path = path.as_ref();

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let classifier = OnnxClassifier::new(session);

        info!(
            input = %classifier.input_name(),
            probability_output = %classifier.probability_output(),
            label_output = ?classifier.label_output(),
            "ONNX model loaded"
        );

        Ok(classifier)
    }
}

impl Default for ArtifactLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `load` when the file exists, turning any failure into a warning
fn load_optional<T, F>(name: &str, path: &str, load: F) -> Option<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let path = Path::new(path);
    if !path.exists() {
        warn!(artifact = %name, path = %path.display(), "Artifact file not found");
        return None;
    }

    match load(path) {
        Ok(artifact) => {
            info!(artifact = %name, path = %path.display(), "Artifact loaded");
            Some(artifact)
        }
        Err(e) => {
            warn!(
                artifact = %name,
                path = %path.display(),
                error = %format!("{:#}", e),
                "Failed to load artifact, skipping"
            );
            None
        }
    }
}
