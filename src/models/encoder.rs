//! Label encoder for the Neighbourhood column

use crate::types::response::Neighbourhood;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct EncoderFile {
    classes: Vec<String>,
}

/// Known neighbourhood names; a name's encoded id is its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Load the encoder from its JSON artifact
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read label encoder from {:?}", path))?;
        let file: EncoderFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse label encoder from {:?}", path))?;

        if file.classes.is_empty() {
            bail!("Label encoder at {:?} has no classes", path);
        }

        Ok(Self::new(file.classes))
    }

    /// Number of known categories
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Catalog of `{id, name}` pairs in encoder order
    pub fn neighbourhoods(&self) -> Vec<Neighbourhood> {
        self.classes
            .iter()
            .enumerate()
            .map(|(id, name)| Neighbourhood {
                id,
                name: name.clone(),
            })
            .collect()
    }
}
