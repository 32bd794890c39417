// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod config;
pub mod version;
pub mod vision;

pub use api::{create_app, start_server, AppState, PredictError};
pub use classifier::{Classifier, ClassifierConfig, Label, ModelManager, OnnxClassifier};
pub use config::ServiceConfig;
pub use vision::{DetectorKind, StarDetector, StarKind, StarSet};
