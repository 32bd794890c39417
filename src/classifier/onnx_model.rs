// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX classifier wrapper
//!
//! Loads the serialized classifier artifact with ONNX Runtime. The first
//! output is read in this order:
//! - `i64` or `i32` label tensor (scikit-learn exports): the first element is the label
//! - string label tensor (classifiers trained on string classes): the first element
//! - `f32` score tensor: the argmax index is the label, optionally mapped
//!   through a list of class names

use anyhow::{anyhow, Context, Result};
use ndarray::Array2;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::{Classifier, Label};
use crate::vision::FEATURE_LEN;

/// Classifier backed by an ONNX Runtime session
#[derive(Clone)]
pub struct OnnxClassifier {
    /// ONNX Runtime session (run needs exclusive access)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Optional names for score-tensor outputs, indexed by class
    class_names: Option<Arc<Vec<String>>>,
    /// File stem of the artifact
    model_name: String,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .field("class_names", &self.class_names.as_ref().map(|n| n.len()))
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Load the classifier from an ONNX file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Classifier model not found: {}", model_path.display());
        }

        info!("Loading classifier model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(1)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load classifier model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input".to_string());

        if let Some(input) = session.inputs.first() {
            debug!("Classifier input {}: {:?}", input_name, input.input_type);
        }

        let model_name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "classifier".to_string());

        info!("✅ Classifier model loaded (input: {})", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            class_names: None,
            model_name,
        })
    }

    /// Attach class names used to translate argmax indices
    pub fn with_class_names(mut self, names: Vec<String>) -> Self {
        self.class_names = Some(Arc::new(names));
        self
    }

}

/// First element of a label tensor
fn first_label<T: ToString>(labels: impl IntoIterator<Item = T>) -> Result<Label> {
    labels
        .into_iter()
        .next()
        .map(|label| Label::new(label.to_string()))
        .ok_or_else(|| anyhow!("Classifier returned an empty label tensor"))
}

/// Index of the highest score; the earliest index wins ties
fn argmax(scores: impl IntoIterator<Item = f32>) -> Option<usize> {
    scores
        .into_iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((i, score)),
        })
        .map(|(index, _)| index)
}

/// Class name for `index`, or the index itself when no name is known
fn label_for_index(class_names: Option<&[String]>, index: usize) -> Label {
    match class_names.and_then(|names| names.get(index)) {
        Some(name) => Label::new(name.clone()),
        None => Label::new(index.to_string()),
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f32]) -> Result<Label> {
        if features.len() != FEATURE_LEN {
            anyhow::bail!(
                "Invalid feature length: {}, expected {}",
                features.len(),
                FEATURE_LEN
            );
        }

        let input = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .context("Failed to create input array")?;
        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Classifier session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Classifier inference failed")?;

        let output = &outputs[0];

        if let Ok(labels) = output.try_extract_array::<i64>() {
            return first_label(labels.iter());
        }
        if let Ok(labels) = output.try_extract_array::<i32>() {
            return first_label(labels.iter());
        }
        if let Ok((_, labels)) = output.try_extract_strings() {
            return first_label(labels);
        }

        let scores = output
            .try_extract_array::<f32>()
            .context("Classifier output is neither a label tensor nor f32 scores")?;
        let index = argmax(scores.iter().copied())
            .ok_or_else(|| anyhow!("Classifier returned an empty score tensor"))?;

        Ok(label_for_index(self.class_names.as_deref().map(Vec::as_slice), index))
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
