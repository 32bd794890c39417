// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use image::DynamicImage;

use super::{StarAnnotation, StarDetector, StarKind, StarSet};

/// Returns the same three placeholder stars for every image
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticStarDetector;

impl StarDetector for StaticStarDetector {
    fn detect(&self, _image: &DynamicImage) -> StarSet {
        let mut stars = StarSet::default();
        stars.push(StarKind::FourPoint, StarAnnotation::new(0.2, 0.3, 0.05));
        stars.push(StarKind::FivePoint, StarAnnotation::new(0.5, 0.5, 0.07));
        stars.push(StarKind::SixPoint, StarAnnotation::new(0.8, 0.7, 0.06));
        stars
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
