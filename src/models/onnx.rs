//! ONNX Runtime classifier backend

use crate::models::classifier::{
    label_for, Classification, Classifier, DEFAULT_THRESHOLD, NO_SHOW_CLASS,
};
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::session::{Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Loaded ONNX classifier with its resolved input/output names
pub struct OnnxClassifier {
    /// ONNX Runtime session; `run` needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    input_name: String,
    /// Output holding class probabilities
    probability_output: String,
    /// Output holding the predicted label, if the graph exports one
    label_output: Option<String>,
}

impl OnnxClassifier {
    /// Wrap a session, resolving the input and output names to use
    pub fn new(session: Session) -> Self {
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "probabilities".to_string());

        Self {
            session: Mutex::new(session),
            input_name,
            probability_output,
            label_output,
        }
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn probability_output(&self) -> &str {
        &self.probability_output
    }

    pub fn label_output(&self) -> Option<&str> {
        self.label_output.as_deref()
    }

    /// Run the graph once and read both outputs
    fn run(&self, features: &[f32]) -> Result<Classification> {
        // Shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let probability = self.extract_probability(&outputs)?;
        let label = self
            .extract_label(&outputs)
            .unwrap_or_else(|| label_for(probability, DEFAULT_THRESHOLD));

        debug!(label = label, probability = probability, "ONNX inference complete");

        Ok(Classification { label, probability })
    }

    /// Read the predicted label from an int64 tensor output
    fn extract_label(&self, outputs: &SessionOutputs) -> Option<i64> {
        let name = self.label_output.as_deref()?;
        let output = outputs.get(name)?;
        let (_, data) = output.try_extract_tensor::<i64>().ok()?;
        data.first().copied()
    }

    /// Read the no-show probability.
    ///
    /// Handles both `[batch, n_classes]` tensors and `seq(map(int64, float))`
    /// outputs, which is what skl2onnx emits with ZipMap enabled.
    fn extract_probability(&self, outputs: &SessionOutputs) -> Result<f64> {
        if let Some(output) = outputs.get(&self.probability_output) {
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                return positive_class_from_tensor(&dims, data);
            }

            let dtype = output.dtype();
            if DynSequenceValueType::can_downcast(&dtype) {
                return positive_class_from_sequence_map(output);
            }
        }

        // Fall back to any non-label float tensor output
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                warn!(output = %name, "Probability output not found by name, using fallback");
                return positive_class_from_tensor(&dims, data);
            }
        }

        anyhow::bail!("Model produced no probability output")
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn predict(&self, features: &[f32]) -> Result<i64> {
        Ok(self.run(features)?.label)
    }

    fn predict_proba(&self, features: &[f32]) -> Result<f64> {
        Ok(self.run(features)?.probability)
    }

    fn classify(&self, features: &[f32]) -> Result<Classification> {
        self.run(features)
    }
}

/// Pick the positive-class probability from a probability tensor
fn positive_class_from_tensor(dims: &[i64], data: &[f32]) -> Result<f64> {
    let num_classes = match dims {
        [_, classes] => *classes,
        [classes] => *classes,
        _ => anyhow::bail!("Unexpected probability tensor shape {:?}", dims),
    };

    let index = match num_classes {
        // Single sigmoid output
        1 => 0,
        n if n >= 2 => NO_SHOW_CLASS as usize,
        _ => anyhow::bail!("Probability tensor has no classes"),
    };

    data.get(index)
        .map(|&p| p as f64)
        .ok_or_else(|| anyhow::anyhow!("Probability tensor is empty"))
}

/// Extract probability from seq(map(int64, float)) format
fn positive_class_from_sequence_map(output: &DynValue) -> Result<f64> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

    // batch_size is always 1
    let map_value = maps
        .first()
        .ok_or_else(|| anyhow::anyhow!("Empty probability sequence"))?;

    let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

    if let Some((_, prob)) = kv_pairs.iter().find(|(class, _)| *class == NO_SHOW_CLASS) {
        return Ok(*prob as f64);
    }
    if let Some((_, prob)) = kv_pairs.iter().find(|(class, _)| *class == 0) {
        return Ok(1.0 - *prob as f64);
    }

    Err(anyhow::anyhow!("No probability found in map"))
}
