//! Capture Orchestrator
//!
//! Runs the per-frame capture pipeline:
//! - Face, QR code, and full-frame analyzers
//! - Geometry mapping and ROI validation of the closest subject
//! - Illumination gating and interval/count throttling of saved images
//! - Edge-triggered subject events and the preview overlay
//! - Inline or background persistence through an image sink

mod detector;
mod error;
mod event;
mod gate;
mod orchestrator;
mod overlay;
mod persist;
mod sink;
mod tracker;

pub use detector::{
    closest_face, closest_qr_code, FaceDetection, FaceDetector, QrCodeDetection, QrCodeDetector,
};
pub use error::{CaptureError, SinkError};
pub use event::{CameraEventListener, CaptureEvent, FaceProbabilities, NoopListener};
pub use gate::{FrameGate, DETECTION_INTERVAL_MS, QR_CODE_INTERVAL_MS};
pub use orchestrator::{CameraPermission, CaptureOrchestrator};
pub use overlay::Overlay;
pub use persist::PersistMode;
pub use sink::{FileImageSink, ImageSink};
pub use tracker::SubjectTracker;

pub use capture_throttle::SubjectKind;
pub use quality_scorer::QualityMetrics;
pub use roi_validator::Message;
