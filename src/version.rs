// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Star Classifier service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-star-classifier-2026-10-16";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-10-16";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "onnx-classifier",
    "multipart-upload",
    "static-star-annotations",
    "contour-star-detection",
    "sanitized-errors",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Star Classifier {} ({})", VERSION_NUMBER, BUILD_DATE)
}
