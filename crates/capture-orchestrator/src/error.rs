//! Capture pipeline errors

use camera_capture::CameraError;
use thiserror::Error;

/// Image sink failures
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Sink rejected image: {0}")]
    Rejected(String),
}

/// Per-frame pipeline failures, reported through `on_error`
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("Failed to save image: {0}")]
    Sink(#[from] SinkError),

    #[error("Detection failed: {0}")]
    Detection(String),

    #[error("Persistence task failed: {0}")]
    Task(String),
}
