// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pre-trained image classifier
//!
//! The classifier consumes the 4096-element grayscale feature vector produced by
//! [`crate::vision::preprocess_for_classifier`] and returns one discrete label.
//! It is loaded once at startup and shared read-only by every request.

pub mod model_manager;
pub mod onnx_model;

use std::fmt;

pub use model_manager::{ClassifierConfig, ModelInfo, ModelManager};
pub use onnx_model::OnnxClassifier;

/// Predicted class label, rendered verbatim into the response message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-sample classifier over a flattened feature vector
pub trait Classifier: Send + Sync {
    /// Predict the label for one sample
    fn predict(&self, features: &[f32]) -> anyhow::Result<Label>;

    /// Model name for logs and the health endpoint
    fn name(&self) -> &str;
}
