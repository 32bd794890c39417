// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classifier loading at startup
//!
//! A missing or unreadable artifact is not fatal: the manager comes up empty
//! and the service answers predictions with "Model not loaded".

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Classifier, OnnxClassifier};

/// Where to find the classifier artifact
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Path to the ONNX model file
    pub model_path: PathBuf,
    /// Optional file with one class name per line
    pub class_names_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("star_model.onnx"),
            class_names_path: None,
        }
    }
}

/// Summary of the loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: Option<String>,
    pub loaded: bool,
}

/// Owns the process-wide classifier handle
#[derive(Clone, Default)]
pub struct ModelManager {
    classifier: Option<Arc<dyn Classifier>>,
}

impl std::fmt::Debug for ModelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelManager")
            .field("classifier", &self.classifier.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

impl ModelManager {
    /// Load the classifier described by `config`, degrading to an empty manager on failure
    pub fn load(config: &ClassifierConfig) -> Self {
        if !config.model_path.exists() {
            tracing::warn!(
                "⚠️ Classifier model not found at {} - predictions disabled",
                config.model_path.display()
            );
            return Self::empty();
        }

        let classifier = match OnnxClassifier::new(&config.model_path) {
            Ok(model) => model,
            Err(e) => {
                tracing::error!(
                    "❌ Failed to load classifier from {}: {:#}",
                    config.model_path.display(),
                    e
                );
                return Self::empty();
            }
        };

        let classifier = match config.class_names_path.as_deref() {
            Some(path) => match load_class_names(path) {
                Ok(names) => {
                    tracing::info!("Loaded {} class names from {}", names.len(), path.display());
                    classifier.with_class_names(names)
                }
                Err(e) => {
                    tracing::warn!("⚠️ Ignoring class names file: {:#}", e);
                    classifier
                }
            },
            None => classifier,
        };

        tracing::info!("✅ Classifier ready: {}", classifier.name());
        Self::with_classifier(Arc::new(classifier))
    }

    /// Manager with no classifier (degraded mode)
    pub fn empty() -> Self {
        Self { classifier: None }
    }

    /// Manager wrapping an already constructed classifier
    pub fn with_classifier(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier: Some(classifier),
        }
    }

    pub fn classifier(&self) -> Option<Arc<dyn Classifier>> {
        self.classifier.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.classifier.as_ref().map(|c| c.name().to_string()),
            loaded: self.is_loaded(),
        }
    }
}

/// Read class names, one per line, skipping blank lines
pub fn load_class_names(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read class names from {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
