//! Capture Options
//!
//! The single configuration record read by every stage of the capture
//! pipeline. Setters validate their input at the boundary and reject
//! out-of-range values without touching the stored option.

mod color;
mod error;
mod options;
mod roi;
mod shared;

pub use camera_capture::CameraLens;
pub use color::Color;
pub use error::ConfigError;
pub use options::{CaptureOptions, CaptureType};
pub use roi::Roi;
pub use shared::SharedOptions;
