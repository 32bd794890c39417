// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction response types

use serde::{Deserialize, Serialize};

use crate::classifier::Label;
use crate::vision::StarSet;

/// Prefix of the `message` field, followed by the predicted label
pub const PREDICTION_PREFIX: &str = "Predicción: ";

/// Successful response from POST /predict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// "Predicción: <label>"
    pub message: String,
    /// Star annotations grouped by shape
    pub stars: StarSet,
}

impl PredictResponse {
    pub fn new(label: &Label, stars: StarSet) -> Self {
        Self {
            message: format!("{}{}", PREDICTION_PREFIX, label),
            stars,
        }
    }
}
