// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload extraction and validation for POST /predict

use axum::body::Bytes;
use axum_extra::extract::Multipart;
use tracing::debug;

use crate::api::errors::PredictError;

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Filename extensions accepted for upload (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// The `file` part of a prediction request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename declared by the client, only used for the extension check
    pub filename: String,
    /// Declared content type, informational
    pub content_type: Option<String>,
    /// Raw image bytes
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Check filename preconditions in order: non-empty, then allowed extension
    pub fn validate(&self) -> Result<(), PredictError> {
        if self.filename.is_empty() {
            return Err(PredictError::EmptyFilename);
        }

        if !allowed_file(&self.filename) {
            return Err(PredictError::UnsupportedFileType(self.filename.clone()));
        }

        Ok(())
    }
}

/// True when the last dot-segment of `filename` is an allowed extension
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Pull the first file part named `file` out of the multipart body
///
/// Parts without a filename are plain form values, not files, and are skipped.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, PredictError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        PredictError::InvalidUpload {
            status: e.status(),
            detail: e.body_text(),
        }
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_string) else {
            debug!("Field '{}' has no filename, treating as form value", FILE_FIELD);
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let bytes = field.bytes().await.map_err(|e| PredictError::InvalidUpload {
            status: e.status(),
            detail: e.body_text(),
        })?;

        return Ok(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    Err(PredictError::MissingFile)
}
