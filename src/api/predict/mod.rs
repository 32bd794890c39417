// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction API endpoint module
//!
//! Provides POST /predict for classifying uploaded images.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{predict_handler, run_prediction, Prediction};
pub use request::{allowed_file, UploadedFile, ALLOWED_EXTENSIONS};
pub use response::{PredictResponse, PREDICTION_PREFIX};
