//! Model artifacts and inference

pub mod classifier;
pub mod encoder;
pub mod inference;
pub mod loader;
pub mod onnx;
pub mod scaler;

pub use classifier::{Classification, Classifier, LogisticClassifier};
pub use encoder::LabelEncoder;
pub use inference::InferenceEngine;
pub use loader::{ArtifactLoader, Artifacts};
pub use onnx::OnnxClassifier;
pub use scaler::StandardScaler;
