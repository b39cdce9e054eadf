//! HTTP-facing error type

use crate::types::response::ErrorResponse;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors a request can end with. Every variant renders as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Classifier or scaler missing at startup
    #[error("Model not loaded")]
    ModelNotLoaded,

    /// Neighbourhood encoder missing at startup
    #[error("Label encoder not loaded")]
    LabelEncoderNotLoaded,

    /// Request body could not be parsed into the expected schema
    #[error("{0}")]
    InvalidRequest(String),

    /// The model runtime failed on an otherwise valid request
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ModelNotLoaded | ApiError::LabelEncoderNotLoaded => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.to_string(),
        })
    }
}
