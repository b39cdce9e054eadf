//! Feature extraction for no-show model inference.
//!
//! The scaler and classifier were fit against a fixed column order, so the
//! row produced here must follow that order exactly.

use crate::types::request::PredictionRequest;

/// Number of model input features
pub const FEATURE_COUNT: usize = 10;

/// Column names in the order the model expects them
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Gender",
    "Age",
    "Neighbourhood",
    "Scholarship",
    "Hipertension",
    "Diabetes",
    "Alcoholism",
    "Handcap",
    "SMS_received",
    "WaitDays",
];

/// Feature extractor that turns a request into a single model input row.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Build the feature row for a request.
    pub fn extract(&self, request: &PredictionRequest) -> [f32; FEATURE_COUNT] {
        [
            request.gender as f32,
            request.age as f32,
            request.neighbourhood as f32,
            request.scholarship as f32,
            request.hipertension as f32,
            request.diabetes as f32,
            request.alcoholism as f32,
            request.handcap as f32,
            request.sms_received as f32,
            request.wait_days as f32,
        ]
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names in column order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
