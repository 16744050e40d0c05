//! Configuration Error Types

use thiserror::Error;

/// Invalid configuration input, one variant per option key
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid capture type: {0}")]
    InvalidCaptureType(String),

    #[error("Invalid camera lens: {0}")]
    InvalidCameraLens(String),

    #[error("Invalid number of images {0}: must be >= 0")]
    InvalidNumberOfImages(i64),

    #[error("Invalid time between images {0}ms: must be in [0, i64::MAX]")]
    InvalidTimeBetweenImages(i128),

    #[error("Invalid output image width {0}: must be > 0")]
    InvalidOutputImageWidth(i64),

    #[error("Invalid output image height {0}: must be > 0")]
    InvalidOutputImageHeight(i64),

    #[error("Invalid face padding percent {0}: must be >= 0")]
    InvalidFacePaddingPercent(f64),

    #[error("Invalid minimum size {0}: must be in [0, 1]")]
    InvalidMinimumSize(f64),

    #[error("Invalid maximum size {0}: must be in [0, 1]")]
    InvalidMaximumSize(f64),

    #[error("Invalid ROI top offset {0}: must be in [0, 1]")]
    InvalidRoiTopOffset(f64),

    #[error("Invalid ROI right offset {0}: must be in [0, 1]")]
    InvalidRoiRightOffset(f64),

    #[error("Invalid ROI bottom offset {0}: must be in [0, 1]")]
    InvalidRoiBottomOffset(f64),

    #[error("Invalid ROI left offset {0}: must be in [0, 1]")]
    InvalidRoiLeftOffset(f64),

    #[error("Invalid ROI area offset color")]
    InvalidRoiColor,

    #[error("Invalid face contours color")]
    InvalidFaceContoursColor,

    #[error("Invalid detection box color")]
    InvalidDetectionBoxColor,

    #[error("Configuration load failed: {0}")]
    Load(#[from] config::ConfigError),
}

impl ConfigError {
    /// Stable key reported to UI layers
    pub fn key(&self) -> &'static str {
        match self {
            ConfigError::InvalidCaptureType(_) => "INVALID_CAPTURE_TYPE",
            ConfigError::InvalidCameraLens(_) => "INVALID_CAMERA_LENS",
            ConfigError::InvalidNumberOfImages(_) => "INVALID_NUMBER_OF_IMAGES",
            ConfigError::InvalidTimeBetweenImages(_) => "INVALID_TIME_BETWEEN_IMAGES",
            ConfigError::InvalidOutputImageWidth(_) => "INVALID_OUTPUT_IMAGE_WIDTH",
            ConfigError::InvalidOutputImageHeight(_) => "INVALID_OUTPUT_IMAGE_HEIGHT",
            ConfigError::InvalidFacePaddingPercent(_) => "INVALID_FACE_PADDING_PERCENT",
            ConfigError::InvalidMinimumSize(_) => "INVALID_MINIMUM_SIZE",
            ConfigError::InvalidMaximumSize(_) => "INVALID_MAXIMUM_SIZE",
            ConfigError::InvalidRoiTopOffset(_) => "INVALID_ROI_TOP_OFFSET",
            ConfigError::InvalidRoiRightOffset(_) => "INVALID_ROI_RIGHT_OFFSET",
            ConfigError::InvalidRoiBottomOffset(_) => "INVALID_ROI_BOTTOM_OFFSET",
            ConfigError::InvalidRoiLeftOffset(_) => "INVALID_ROI_LEFT_OFFSET",
            ConfigError::InvalidRoiColor => "INVALID_ROI_COLOR",
            ConfigError::InvalidFaceContoursColor => "INVALID_FACE_CONTOURS_COLOR",
            ConfigError::InvalidDetectionBoxColor => "INVALID_DETECTION_BOX_COLOR",
            ConfigError::Load(_) => "INVALID_CONFIGURATION",
        }
    }
}
