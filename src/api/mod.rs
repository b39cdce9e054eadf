//! HTTP surface of the prediction service

pub mod cors;
pub mod handlers;

use crate::error::ApiError;
use crate::metrics::ServiceMetrics;
use crate::models::inference::InferenceEngine;
use crate::models::loader::Artifacts;
use actix_web::web;
use std::sync::Arc;

pub use cors::build_cors;

/// Liveness message served on `/`
pub const SERVICE_MESSAGE: &str = "Medical Appointments No-Show Prediction API";

/// State shared by every handler, built once at startup
pub struct AppState {
    pub engine: InferenceEngine,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(artifacts: Arc<Artifacts>, metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            engine: InferenceEngine::new(artifacts),
            metrics,
        }
    }

    pub fn artifacts(&self) -> &Artifacts {
        self.engine.artifacts()
    }
}

/// Register routes and the JSON body rejection handler
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::InvalidRequest(err.to_string()).into()
    }))
    .route("/", web::get().to(handlers::root))
    .route("/health", web::get().to(handlers::health))
    .route("/predict", web::post().to(handlers::predict))
    .route("/neighbourhoods", web::get().to(handlers::neighbourhoods));
}
