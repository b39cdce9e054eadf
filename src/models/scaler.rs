//! Standard scaler fitted at training time

use crate::feature_extractor::{FEATURE_COUNT, FEATURE_NAMES};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ScalerFile {
    mean: Vec<f64>,
    scale: Vec<f64>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

/// Per-column `(x - mean) / scale` transform.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Build a scaler from fitted parameters.
    ///
    /// Zero scale entries (constant training columns) are replaced by 1.
    pub fn new(mean: &[f64], scale: &[f64]) -> Result<Self> {
        if mean.len() != FEATURE_COUNT || scale.len() != FEATURE_COUNT {
            bail!(
                "Scaler expects {} features, got mean={} scale={}",
                FEATURE_COUNT,
                mean.len(),
                scale.len()
            );
        }

        let mut scaler = Self {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        };
        for i in 0..FEATURE_COUNT {
            scaler.mean[i] = mean[i];
            scaler.scale[i] = if scale[i] == 0.0 { 1.0 } else { scale[i] };
        }
        Ok(scaler)
    }

    /// Load a scaler from its JSON artifact
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler from {:?}", path))?;
        let file: ScalerFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scaler from {:?}", path))?;

        if let Some(names) = &file.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                bail!(
                    "Scaler was fit on columns {:?}, expected {:?}",
                    names,
                    FEATURE_NAMES
                );
            }
        }

        Self::new(&file.mean, &file.scale)
    }

    /// Scale a feature row
    pub fn transform(&self, features: &[f32; FEATURE_COUNT]) -> [f32; FEATURE_COUNT] {
        let mut scaled = [0.0_f32; FEATURE_COUNT];
        for (i, value) in features.iter().enumerate() {
            scaled[i] = ((*value as f64 - self.mean[i]) / self.scale[i]) as f32;
        }
        scaled
    }
}
