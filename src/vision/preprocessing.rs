// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the star classifier

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};

/// Side length of the square image the classifier was trained on
pub const CLASSIFIER_INPUT_SIZE: u32 = 64;

/// Number of features fed to the classifier (64 * 64)
pub const FEATURE_LEN: usize = (CLASSIFIER_INPUT_SIZE * CLASSIFIER_INPUT_SIZE) as usize;

/// Preprocess an image into the classifier feature vector
///
/// Steps:
/// 1. Convert to 8-bit grayscale (luma)
/// 2. Resize to 64x64 with bilinear interpolation
/// 3. Flatten row-major into raw 0-255 intensities
pub fn preprocess_for_classifier(image: &DynamicImage) -> Vec<f32> {
    let gray = image.to_luma8();
    let resized = resize_gray(&gray, CLASSIFIER_INPUT_SIZE);
    flatten(&resized)
}

fn resize_gray(gray: &GrayImage, size: u32) -> GrayImage {
    if gray.width() == size && gray.height() == size {
        return gray.clone();
    }
    imageops::resize(gray, size, size, FilterType::Triangle)
}

// enumerate_pixels walks rows top to bottom, left to right within a row
fn flatten(gray: &GrayImage) -> Vec<f32> {
    gray.enumerate_pixels().map(|(_, _, p)| p[0] as f32).collect()
}
