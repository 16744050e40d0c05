//! Frame Quality Scoring
//!
//! Scores a grayscale plane on two axes:
//! - Illumination: share of pixels in the dark and light tails of the histogram
//! - Sharpness: spread of the 3x3 Laplacian edge response

mod histogram;
mod sharpness;

pub use histogram::{Histogram, DARK_MAX_BIN, LIGHT_MIN_BIN};
pub use sharpness::{laplacian, sharpness, LAPLACIAN_KERNEL};

use camera_capture::GrayFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reject as too dark above this share of dark pixels
pub const DARKNESS_THRESHOLD: f64 = 0.4;

/// Reject as too light above this share of light pixels
pub const LIGHTNESS_THRESHOLD: f64 = 0.65;

/// Quality metrics for one capture candidate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Fraction of pixels in the dark tail, in [0, 1]
    pub darkness: f64,
    /// Fraction of pixels in the light tail, in [0, 1]
    pub lightness: f64,
    /// Standard deviation of the Laplacian response (higher is sharper)
    pub sharpness: f64,
}

impl QualityMetrics {
    pub fn is_too_dark(&self) -> bool {
        self.darkness > DARKNESS_THRESHOLD
    }

    pub fn is_too_light(&self) -> bool {
        self.lightness > LIGHTNESS_THRESHOLD
    }

    /// Illumination gate. Sharpness is informational only.
    pub fn has_good_illumination(&self) -> bool {
        !self.is_too_dark() && !self.is_too_light()
    }
}

/// Stateless quality scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a grayscale plane; `None` when the plane has no pixels
    pub fn score(&self, plane: &GrayFrame) -> Option<QualityMetrics> {
        let histogram = Histogram::from_plane(plane);
        let (darkness, lightness) = histogram.illumination()?;
        let sharpness = sharpness(plane)?;

        let metrics = QualityMetrics {
            darkness,
            lightness,
            sharpness,
        };
        debug!(
            "Quality: darkness={:.3} lightness={:.3} sharpness={:.2}",
            metrics.darkness, metrics.lightness, metrics.sharpness
        );
        Some(metrics)
    }
}
