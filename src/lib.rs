//! No-Show Prediction Service Library
//!
//! Serves a pre-trained classifier that predicts whether a patient will miss
//! a medical appointment, along with the neighbourhood catalog used to encode
//! its inputs.

pub mod api;
pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod types;

pub use api::AppState;
pub use config::AppConfig;
pub use error::ApiError;
pub use feature_extractor::FeatureExtractor;
pub use models::inference::InferenceEngine;
pub use models::loader::{ArtifactLoader, Artifacts};
pub use types::{PredictionRequest, PredictionResponse};
