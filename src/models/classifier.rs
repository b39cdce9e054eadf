//! Classifier backends

use crate::feature_extractor::FEATURE_COUNT;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Positive class: the patient misses the appointment
pub const NO_SHOW_CLASS: i64 = 1;

/// Default decision threshold on the no-show probability
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Class for a probability; a tie at the threshold counts as a show
pub fn label_for(probability: f64, threshold: f64) -> i64 {
    if probability > threshold {
        NO_SHOW_CLASS
    } else {
        0
    }
}

/// Label and positive-class probability for one scaled row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: i64,
    pub probability: f64,
}

/// A pre-fit binary classifier over a scaled feature row.
pub trait Classifier: Send + Sync {
    /// Short backend name for logs
    fn kind(&self) -> &'static str;

    /// Predicted class (0 = show, 1 = no-show)
    fn predict(&self, features: &[f32]) -> Result<i64>;

    /// Probability of the no-show class
    fn predict_proba(&self, features: &[f32]) -> Result<f64>;

    /// Both outputs at once; backends that produce them in a single pass override this
    fn classify(&self, features: &[f32]) -> Result<Classification> {
        Ok(Classification {
            label: self.predict(features)?,
            probability: self.predict_proba(features)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LogisticFile {
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Logistic regression exported as plain coefficients
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    threshold: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: &[f64], intercept: f64, threshold: f64) -> Result<Self> {
        if coefficients.len() != FEATURE_COUNT {
            bail!(
                "Logistic model expects {} coefficients, got {}",
                FEATURE_COUNT,
                coefficients.len()
            );
        }
        if !(0.0..=1.0).contains(&threshold) {
            bail!("Decision threshold {} outside [0, 1]", threshold);
        }

        let mut weights = [0.0; FEATURE_COUNT];
        weights.copy_from_slice(coefficients);

        Ok(Self {
            coefficients: weights,
            intercept,
            threshold,
        })
    }

    /// Load coefficients from a JSON artifact
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model from {:?}", path))?;
        let file: LogisticFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model from {:?}", path))?;

        Self::new(&file.coefficients, file.intercept, file.threshold)
    }

    fn check_width(&self, features: &[f32]) -> Result<()> {
        if features.len() != FEATURE_COUNT {
            bail!(
                "Expected {} features, got {}",
                FEATURE_COUNT,
                features.len()
            );
        }
        Ok(())
    }
}

impl Classifier for LogisticClassifier {
    fn kind(&self) -> &'static str {
        "logistic"
    }

    fn predict(&self, features: &[f32]) -> Result<i64> {
        let probability = self.predict_proba(features)?;
        Ok(label_for(probability, self.threshold))
    }

    fn predict_proba(&self, features: &[f32]) -> Result<f64> {
        self.check_width(features)?;

        let logit = features
            .iter()
            .zip(self.coefficients.iter())
            .fold(self.intercept, |acc, (&x, &w)| acc + x as f64 * w);

        Ok(sigmoid(logit))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
