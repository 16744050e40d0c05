//! Camera Capture Library for the face/QR capture pipeline
//!
//! Treats the camera as a source of raw pixel buffers:
//! - RGB video frames with crop, resize, and mirroring
//! - Grayscale planes for quality scoring
//! - Lens facing (front cameras are mirrored in the preview)
//! - A pull-based frame source trait with a synthetic implementation

pub mod frame;
pub mod source;

pub use frame::{GrayFrame, PixelRegion, VideoFrame};
pub use source::{FrameSource, SyntheticCamera, SyntheticSubject};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Invalid camera lens: {0}")]
    InvalidLens(String),

    #[error("Frame buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Crop region {region:?} is out of the {width}x{height} frame")]
    CropOutOfBounds {
        region: PixelRegion,
        width: u32,
        height: u32,
    },

    #[error("Invalid output size {width}x{height}")]
    InvalidOutputSize { width: u32, height: u32 },

    #[error("Unable to get image from sample buffer: {0}")]
    Stream(String),
}

/// Camera lens facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraLens {
    /// Selfie camera; preview and saved images are mirrored
    #[default]
    Front,
    /// World-facing camera
    Back,
}

impl CameraLens {
    /// The opposite lens
    pub fn toggled(self) -> Self {
        match self {
            CameraLens::Front => CameraLens::Back,
            CameraLens::Back => CameraLens::Front,
        }
    }

    /// Whether display coordinates and saved images are horizontally mirrored
    pub fn is_mirrored(self) -> bool {
        self == CameraLens::Front
    }

    /// Numeric lens id exposed to UI layers: 0 is front, 1 is back
    pub fn as_index(self) -> u8 {
        match self {
            CameraLens::Front => 0,
            CameraLens::Back => 1,
        }
    }
}

impl FromStr for CameraLens {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(CameraLens::Front),
            "back" => Ok(CameraLens::Back),
            other => Err(CameraError::InvalidLens(other.to_string())),
        }
    }
}

impl fmt::Display for CameraLens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraLens::Front => write!(f, "front"),
            CameraLens::Back => write!(f, "back"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lens_parse() {
        assert_eq!("front".parse::<CameraLens>().unwrap(), CameraLens::Front);
        assert_eq!("back".parse::<CameraLens>().unwrap(), CameraLens::Back);
        assert!(matches!(
            "side".parse::<CameraLens>(),
            Err(CameraError::InvalidLens(_))
        ));
    }

    #[test]
    fn test_lens_toggle() {
        assert_eq!(CameraLens::Front.toggled(), CameraLens::Back);
        assert_eq!(CameraLens::Back.toggled().toggled(), CameraLens::Back);
        assert!(CameraLens::Front.is_mirrored());
        assert!(!CameraLens::Back.is_mirrored());
        assert_eq!(CameraLens::Back.as_index(), 1);
    }
}
