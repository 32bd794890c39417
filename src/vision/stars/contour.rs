// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Contour based star detection
//!
//! The image is split into foreground and background with Otsu's threshold.
//! Whichever side covers less of the image is treated as foreground, so
//! bright stars on a dark sky and dark stars on paper both work. Each
//! 8-connected foreground blob is then described by its radial profile: the
//! distance from the blob centroid to its boundary, binned by angle. A star
//! with N points shows N separate runs of the profile above the level halfway
//! between its innermost and outermost radius.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::region_labelling::{connected_components, Connectivity};
use tracing::debug;

use super::{StarAnnotation, StarDetector, StarKind, StarSet};

/// Segments the image and classifies each blob by its number of points
#[derive(Debug, Clone)]
pub struct ContourStarDetector {
    /// Blobs with fewer pixels than this are treated as noise
    pub min_area: u32,
    /// Angular resolution of the radial profile
    pub angular_bins: usize,
    /// Minimum `(max - min) / max` of the radial profile; rounder blobs are not stars
    pub min_contrast: f64,
}

impl Default for ContourStarDetector {
    fn default() -> Self {
        Self {
            min_area: 16,
            angular_bins: 72,
            min_contrast: 0.25,
        }
    }
}

#[derive(Debug, Default)]
struct Blob {
    sum_x: f64,
    sum_y: f64,
    area: u32,
    touches_border: bool,
    boundary: Vec<(u32, u32)>,
}

impl Blob {
    fn centroid(&self) -> (f64, f64) {
        let area = self.area as f64;
        (self.sum_x / area, self.sum_y / area)
    }
}

impl ContourStarDetector {
    pub fn with_min_area(mut self, min_area: u32) -> Self {
        self.min_area = min_area;
        self
    }

    /// Binary mask with 255 for foreground pixels
    fn foreground_mask(gray: &GrayImage) -> GrayImage {
        let level = otsu_level(gray);
        let total = gray.width() as usize * gray.height() as usize;
        let bright = gray.pixels().filter(|p| p[0] > level).count();
        let bright_is_foreground = bright * 2 <= total;

        GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let is_bright = gray.get_pixel(x, y)[0] > level;
            if is_bright == bright_is_foreground {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    fn collect_blobs(mask: &GrayImage) -> BTreeMap<u32, Blob> {
        let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));
        let (width, height) = labels.dimensions();
        let mut blobs: BTreeMap<u32, Blob> = BTreeMap::new();

        for (x, y, pixel) in labels.enumerate_pixels() {
            let label = pixel[0];
            if label == 0 {
                continue;
            }

            let blob = blobs.entry(label).or_default();
            blob.sum_x += x as f64;
            blob.sum_y += y as f64;
            blob.area += 1;

            let on_edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            if on_edge {
                blob.touches_border = true;
            }

            let differs = |nx: u32, ny: u32| labels.get_pixel(nx, ny)[0] != label;
            if on_edge
                || differs(x - 1, y)
                || differs(x + 1, y)
                || differs(x, y - 1)
                || differs(x, y + 1)
            {
                blob.boundary.push((x, y));
            }
        }

        blobs
    }

    /// Smoothed boundary distance per angular bin, `None` for an empty boundary
    fn radial_profile(&self, blob: &Blob, cx: f64, cy: f64) -> Option<Vec<f64>> {
        let n = self.angular_bins;
        let mut profile = vec![f64::NAN; n];

        for &(x, y) in &blob.boundary {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let angle = dy.atan2(dx) + PI;
            let bin = ((angle / (2.0 * PI)) * n as f64) as usize % n;
            let r = dx.hypot(dy);
            if profile[bin].is_nan() || r > profile[bin] {
                profile[bin] = r;
            }
        }

        // Small blobs leave gaps; carry the last seen radius forward
        let first = profile.iter().position(|r| !r.is_nan())?;
        let mut last = profile[first];
        for step in 0..n {
            let i = (first + step) % n;
            if profile[i].is_nan() {
                profile[i] = last;
            } else {
                last = profile[i];
            }
        }

        Some(
            (0..n)
                .map(|i| (profile[(i + n - 1) % n] + profile[i] + profile[(i + 1) % n]) / 3.0)
                .collect(),
        )
    }

    /// Number of separate runs above the mid radius, 0 for round shapes
    fn count_points(&self, profile: &[f64]) -> usize {
        let (min, max) = profile
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &r| (lo.min(r), hi.max(r)));
        if max <= 0.0 || (max - min) / max < self.min_contrast {
            return 0;
        }

        let mid = (min + max) / 2.0;
        let n = profile.len();
        (0..n)
            .filter(|&i| profile[i] > mid && profile[(i + n - 1) % n] <= mid)
            .count()
    }
}

impl StarDetector for ContourStarDetector {
    fn detect(&self, image: &DynamicImage) -> StarSet {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        let mut stars = StarSet::default();
        if width == 0 || height == 0 {
            return stars;
        }

        let mask = Self::foreground_mask(&gray);
        let blobs = Self::collect_blobs(&mask);
        let short_side = width.min(height) as f64;

        let mut found: Vec<(StarKind, StarAnnotation)> = Vec::new();
        for (label, blob) in &blobs {
            if blob.area < self.min_area || blob.touches_border {
                continue;
            }

            let (cx, cy) = blob.centroid();
            let Some(profile) = self.radial_profile(blob, cx, cy) else {
                continue;
            };

            let points = self.count_points(&profile);
            let Some(kind) = StarKind::from_points(points) else {
                debug!("Blob {} skipped: {} points", label, points);
                continue;
            };

            let outer = profile.iter().copied().fold(0.0, f64::max);
            found.push((
                kind,
                StarAnnotation::new(
                    (cx + 0.5) / width as f64,
                    (cy + 0.5) / height as f64,
                    outer / short_side,
                ),
            ));
        }

        found.sort_by(|a, b| a.1.y.total_cmp(&b.1.y).then(a.1.x.total_cmp(&b.1.x)));
        debug!("Contour detector found {} stars in {} blobs", found.len(), blobs.len());

        for (kind, star) in found {
            stars.push(kind, star);
        }
        stars
    }

    fn name(&self) -> &'static str {
        "contour"
    }
}
