// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling for the prediction pipeline
//!
//! This module provides:
//! - Decoding of uploaded image bytes
//! - Preprocessing into the classifier feature vector
//! - Star shape annotation

pub mod image_utils;
pub mod preprocessing;
pub mod stars;

pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
pub use preprocessing::{preprocess_for_classifier, CLASSIFIER_INPUT_SIZE, FEATURE_LEN};
pub use stars::{
    build_detector, ContourStarDetector, DetectorKind, StarAnnotation, StarDetector, StarKind,
    StarSet, StaticStarDetector,
};
