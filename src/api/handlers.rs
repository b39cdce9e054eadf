//! Request handlers

use crate::api::{AppState, SERVICE_MESSAGE};
use crate::error::ApiError;
use crate::types::request::PredictionRequest;
use crate::types::response::{HealthResponse, NeighbourhoodsResponse, RootResponse};
use actix_web::{web, HttpResponse};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Liveness message
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(RootResponse {
        message: SERVICE_MESSAGE.to_string(),
    })
}

/// Load status of each artifact; always 200
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let artifacts = state.artifacts();
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: artifacts.model_loaded(),
        scaler_loaded: artifacts.scaler_loaded(),
        label_encoder_loaded: artifacts.label_encoder_loaded(),
    })
}

/// Score one appointment; 503 when the classifier or scaler is missing
pub async fn predict(
    state: web::Data<AppState>,
    body: web::Json<PredictionRequest>,
) -> Result<HttpResponse, ApiError> {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4();
    let request = body.into_inner();

    if !state.engine.is_ready() {
        state.metrics.record_unavailable();
        warn!(request_id = %request_id, "Prediction rejected, model not loaded");
        return Err(ApiError::ModelNotLoaded);
    }

    debug!(request_id = %request_id, request = ?request, "Prediction request received");

    // Inference is CPU-bound; keep it off the async workers
    let worker_state = state.clone();
    let result = web::block(move || worker_state.engine.predict(&request))
        .await
        .map_err(|e| {
            error!(request_id = %request_id, error = %e, "Blocking inference task failed");
            ApiError::Inference(e.to_string())
        })?;

    match result {
        Ok(response) => {
            let latency = start_time.elapsed();
            state
                .metrics
                .record_prediction(latency, response.prediction, response.probability);
            info!(
                request_id = %request_id,
                prediction = response.prediction,
                probability = response.probability,
                latency_us = latency.as_micros() as u64,
                "Prediction served"
            );
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            match &e {
                ApiError::ModelNotLoaded => state.metrics.record_unavailable(),
                _ => state.metrics.record_inference_failure(),
            }
            warn!(request_id = %request_id, error = %e, "Prediction failed");
            Err(e)
        }
    }
}

/// Neighbourhood catalog for client-side display
pub async fn neighbourhoods(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let encoder = match &state.artifacts().label_encoder {
        Some(encoder) => encoder,
        None => {
            state.metrics.record_unavailable();
            return Err(ApiError::LabelEncoderNotLoaded);
        }
    };

    Ok(HttpResponse::Ok().json(NeighbourhoodsResponse {
        neighbourhoods: encoder.neighbourhoods(),
    }))
}
