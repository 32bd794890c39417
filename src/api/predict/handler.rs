// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::{multipart::MultipartRejection, Multipart};
use tracing::{debug, info};

use super::request::read_upload;
use super::response::PredictResponse;
use crate::api::errors::PredictError;
use crate::api::http_server::AppState;
use crate::classifier::{Classifier, Label};
use crate::vision::{decode_image_bytes, preprocess_for_classifier, StarDetector, StarSet};

/// Result of running the pipeline on one image
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: Label,
    pub stars: StarSet,
}

/// POST /predict - Classify an uploaded image and annotate its stars
///
/// # Request
/// Multipart body with a `file` part whose filename ends in png, jpg, jpeg or gif.
///
/// # Response
/// - `message`: "Predicción: <label>"
/// - `stars`: `fourPoint`, `fivePoint` and `sixPoint` annotation lists
///
/// # Errors
/// - 400 Bad Request: missing `file` part, empty filename, disallowed extension
/// - 500 Internal Server Error: model not loaded, undecodable image, inference failure
pub async fn predict_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    let multipart = multipart.map_err(|e| {
        debug!("Request body is not multipart: {}", e);
        PredictError::MissingFile
    })?;

    // 1. Extract and validate the upload
    let upload = read_upload(multipart).await?;
    upload.validate()?;

    info!(
        "Prediction request: {} ({} bytes, {})",
        upload.filename,
        upload.bytes.len(),
        upload.content_type.as_deref().unwrap_or("no content type")
    );

    // 2. Decode, preprocess, classify and annotate off the async runtime
    let classifier = state.model_manager.classifier();
    let detector = state.detector.clone();
    let prediction = tokio::task::spawn_blocking(move || {
        run_prediction(&upload.bytes, classifier.as_deref(), detector.as_ref())
    })
    .await
    .map_err(|e| PredictError::Internal(format!("prediction task aborted: {}", e)))??;

    info!(
        "Predicted label {} with {} star annotations",
        prediction.label,
        prediction.stars.len()
    );

    Ok(Json(PredictResponse::new(&prediction.label, prediction.stars)))
}

/// Run the synchronous pipeline on raw image bytes
///
/// The model check happens after decoding, so an undecodable image is reported
/// as such even when no model is loaded.
pub fn run_prediction(
    bytes: &[u8],
    classifier: Option<&dyn Classifier>,
    detector: &dyn StarDetector,
) -> Result<Prediction, PredictError> {
    let (image, info) = decode_image_bytes(bytes)?;
    debug!(
        "Decoded image: {}x{} {:?}, {} bytes",
        info.width, info.height, info.format, info.size_bytes
    );

    let features = preprocess_for_classifier(&image);

    let classifier = classifier.ok_or(PredictError::ModelUnavailable)?;
    let label = classifier
        .predict(&features)
        .map_err(PredictError::Inference)?;

    let stars = detector.detect(&image);

    Ok(Prediction { label, stars })
}
