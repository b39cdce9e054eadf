//! Single-row inference over the loaded artifacts

use crate::error::ApiError;
use crate::feature_extractor::FeatureExtractor;
use crate::models::loader::Artifacts;
use crate::types::request::PredictionRequest;
use crate::types::response::PredictionResponse;
use std::sync::Arc;
use tracing::{debug, error};

/// Runs the fixed pipeline: feature row, scaler, classifier.
pub struct InferenceEngine {
    artifacts: Arc<Artifacts>,
    extractor: FeatureExtractor,
}

impl InferenceEngine {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self {
            artifacts,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Artifacts this engine reads from
    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Whether both the classifier and the scaler are present
    pub fn is_ready(&self) -> bool {
        self.artifacts.model_loaded() && self.artifacts.scaler_loaded()
    }

    /// Score one appointment.
    ///
    /// Nothing is computed unless both the classifier and the scaler are loaded.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, ApiError> {
        let (classifier, scaler) = match (&self.artifacts.classifier, &self.artifacts.scaler) {
            (Some(classifier), Some(scaler)) => (classifier, scaler),
            _ => return Err(ApiError::ModelNotLoaded),
        };

        let features = self.extractor.extract(request);
        let scaled = scaler.transform(&features);

        let result = classifier.classify(&scaled).map_err(|e| {
            error!(backend = classifier.kind(), error = %format!("{:#}", e), "Inference failed");
            ApiError::Inference(format!("{:#}", e))
        })?;

        if result.probability.is_nan() {
            return Err(ApiError::Inference(
                "Model returned a non-numeric probability".to_string(),
            ));
        }
        let probability = result.probability.clamp(0.0, 1.0);

        debug!(
            backend = classifier.kind(),
            features = ?features,
            prediction = result.label,
            probability = probability,
            "Prediction complete"
        );

        Ok(PredictionResponse {
            prediction: result.label,
            probability,
        })
    }
}
