//! Response bodies returned by the API

use serde::{Deserialize, Serialize};

/// Liveness message served on `/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Outcome of a single prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// 0 = show, 1 = no-show
    pub prediction: i64,
    /// Probability of no-show, in [0, 1]
    pub probability: f64,
}

/// Artifact load status served on `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    pub label_encoder_loaded: bool,
}

/// One entry of the neighbourhood catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbourhood {
    /// Encoded id, the position of the name in the encoder's classes
    pub id: usize,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighbourhoodsResponse {
    pub neighbourhoods: Vec<Neighbourhood>,
}

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
