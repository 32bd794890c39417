// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error type for the prediction endpoint
//!
//! Clients only ever see the fixed strings from [`PredictError::client_message`].
//! The full error, including decoder and runtime detail, goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vision::ImageError;

/// JSON body for every error response: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("request has no 'file' part")]
    MissingFile,

    #[error("uploaded file has an empty filename")]
    EmptyFilename,

    #[error("file type not allowed: {0}")]
    UnsupportedFileType(String),

    #[error("upload rejected ({status}): {detail}")]
    InvalidUpload { status: StatusCode, detail: String },

    #[error("classifier model is not loaded")]
    ModelUnavailable,

    #[error("image decode failed: {0}")]
    ImageDecode(#[from] ImageError),

    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PredictError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictError::MissingFile
            | PredictError::EmptyFilename
            | PredictError::UnsupportedFileType(_) => StatusCode::BAD_REQUEST,
            PredictError::InvalidUpload { status, .. } => *status,
            PredictError::ModelUnavailable
            | PredictError::ImageDecode(_)
            | PredictError::Inference(_)
            | PredictError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed, client-safe message for this error
    pub fn client_message(&self) -> &'static str {
        match self {
            PredictError::MissingFile => "No file part",
            PredictError::EmptyFilename => "No selected file",
            PredictError::UnsupportedFileType(_) => "File type not allowed",
            PredictError::InvalidUpload { status, .. } => {
                if *status == StatusCode::PAYLOAD_TOO_LARGE {
                    "File too large"
                } else {
                    "Malformed upload"
                }
            }
            PredictError::ModelUnavailable => "Model not loaded",
            PredictError::ImageDecode(_) => "Could not decode image",
            PredictError::Inference(_) => "Prediction failed",
            PredictError::Internal(_) => "Internal server error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.client_message().to_string(),
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Prediction failed: {} ({:?})", self, self);
        } else {
            tracing::warn!("Prediction rejected: {}", self);
        }

        (status, Json(self.to_response())).into_response()
    }
}
