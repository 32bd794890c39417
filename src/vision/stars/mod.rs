// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Star shape annotation
//!
//! Detectors report stars grouped by how many points they have. Two
//! implementations exist:
//! - [`StaticStarDetector`]: fixed placeholder annotations, independent of input
//! - [`ContourStarDetector`]: segments the image and counts the points of each blob

pub mod contour;
pub mod placeholder;

use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

pub use contour::ContourStarDetector;
pub use placeholder::StaticStarDetector;

/// Star shape categories the service can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StarKind {
    FourPoint,
    FivePoint,
    SixPoint,
}

impl StarKind {
    pub const ALL: [StarKind; 3] = [StarKind::FourPoint, StarKind::FivePoint, StarKind::SixPoint];

    /// Number of tips for this shape
    pub fn points(self) -> usize {
        match self {
            StarKind::FourPoint => 4,
            StarKind::FivePoint => 5,
            StarKind::SixPoint => 6,
        }
    }

    /// Map a counted number of tips to a category
    pub fn from_points(points: usize) -> Option<Self> {
        match points {
            4 => Some(StarKind::FourPoint),
            5 => Some(StarKind::FivePoint),
            6 => Some(StarKind::SixPoint),
            _ => None,
        }
    }

    /// JSON key used in the `stars` object
    pub fn key(self) -> &'static str {
        match self {
            StarKind::FourPoint => "fourPoint",
            StarKind::FivePoint => "fivePoint",
            StarKind::SixPoint => "sixPoint",
        }
    }
}

/// A single star annotation
///
/// `x` and `y` are fractions of image width and height, `radius` is a
/// fraction of the shorter image side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarAnnotation {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl StarAnnotation {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }
}

/// Stars grouped by shape category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarSet {
    pub four_point: Vec<StarAnnotation>,
    pub five_point: Vec<StarAnnotation>,
    pub six_point: Vec<StarAnnotation>,
}

impl StarSet {
    pub fn get(&self, kind: StarKind) -> &[StarAnnotation] {
        match kind {
            StarKind::FourPoint => &self.four_point,
            StarKind::FivePoint => &self.five_point,
            StarKind::SixPoint => &self.six_point,
        }
    }

    pub fn push(&mut self, kind: StarKind, star: StarAnnotation) {
        match kind {
            StarKind::FourPoint => self.four_point.push(star),
            StarKind::FivePoint => self.five_point.push(star),
            StarKind::SixPoint => self.six_point.push(star),
        }
    }

    /// Total number of annotations across all categories
    pub fn len(&self) -> usize {
        StarKind::ALL.iter().map(|k| self.get(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Produces star annotations for a decoded image
///
/// Implementations must be deterministic: the same image always yields the
/// same set.
pub trait StarDetector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> StarSet;

    /// Short identifier reported by the health endpoint
    fn name(&self) -> &'static str;
}

/// Which detector the service runs, selected through configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    #[default]
    Static,
    Contour,
}

/// Build the detector selected by `kind`
pub fn build_detector(kind: DetectorKind) -> Arc<dyn StarDetector> {
    match kind {
        DetectorKind::Static => Arc::new(StaticStarDetector),
        DetectorKind::Contour => Arc::new(ContourStarDetector::default()),
    }
}
