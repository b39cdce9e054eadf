//! Request and response types of the prediction API

pub mod request;
pub mod response;

pub use request::PredictionRequest;
pub use response::{
    ErrorResponse, HealthResponse, Neighbourhood, NeighbourhoodsResponse, PredictionResponse,
    RootResponse,
};
