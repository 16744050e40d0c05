//! Capture pipeline command line driver
//!
//! Wires the orchestrator to a synthetic camera, synthetic detectors, a
//! file sink, and a listener that logs every event as JSON.

use camera_capture::{SyntheticCamera, VideoFrame};
use capture_orchestrator::{
    CameraEventListener, CaptureError, CaptureEvent, FaceDetection, FaceDetector,
    FaceProbabilities, Message, QrCodeDetection, QrCodeDetector, QualityMetrics, SubjectKind,
};
use geometry::{Point, Rect};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Synthetic frame size (square so both display scales match)
pub const FRAME_SIZE: u32 = 240;
/// Synthetic frame rate
pub const FRAMES_PER_SECOND: u32 = 30;
/// Frames to run before exiting
pub const FRAME_COUNT: u32 = 300;
/// Preview size the detections are mapped to
pub const VIEW_SIZE: f64 = 480.0;
/// Directory captured images are written to
pub const OUTPUT_DIR: &str = "captures";

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Listener logging each event as a JSON line
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl LoggingListener {
    fn log(&self, event: CaptureEvent) {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                warn!("Unserializable event {:?}: {}", event, e);
                return;
            }
        };
        // Face detections arrive every processed frame
        if matches!(event, CaptureEvent::FaceDetected { .. }) {
            debug!(target: "capture_events", "{}", json);
        } else {
            info!(target: "capture_events", "{}", json);
        }
    }
}

impl CameraEventListener for LoggingListener {
    fn on_image_captured(
        &self,
        kind: SubjectKind,
        count: u32,
        total: u32,
        path: &str,
        metrics: Option<&QualityMetrics>,
    ) {
        self.log(CaptureEvent::ImageCaptured {
            kind,
            count,
            total,
            path: path.to_string(),
            metrics: metrics.copied(),
        });
    }

    fn on_face_detected(&self, geometry: &Rect, probabilities: &FaceProbabilities) {
        self.log(CaptureEvent::FaceDetected {
            geometry: *geometry,
            probabilities: *probabilities,
        });
    }

    fn on_face_undetected(&self) {
        self.log(CaptureEvent::FaceUndetected);
    }

    fn on_qr_code_scanned(&self, value: &str) {
        self.log(CaptureEvent::QrCodeScanned {
            value: value.to_string(),
        });
    }

    fn on_end_capture(&self) {
        self.log(CaptureEvent::EndCapture);
    }

    fn on_message(&self, message: Message) {
        self.log(CaptureEvent::Message(message));
    }

    fn on_error(&self, error: &str) {
        self.log(CaptureEvent::Error(error.to_string()));
    }

    fn on_permission_denied(&self) {
        self.log(CaptureEvent::PermissionDenied);
    }
}

/// Reports the square subject painted by a [`SyntheticCamera`] of the same size
pub struct SyntheticFaceDetector {
    camera: SyntheticCamera,
}

impl SyntheticFaceDetector {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            camera: SyntheticCamera::new(width, height, 1, 0),
        }
    }

    fn subject_box(&self, frame: &VideoFrame) -> Rect {
        let subject = self.camera.subject_at(frame.sequence);
        Rect::from_xywh(
            subject.x as f64,
            subject.y as f64,
            subject.size as f64,
            subject.size as f64,
        )
    }
}

impl FaceDetector for SyntheticFaceDetector {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<FaceDetection>, CaptureError> {
        let bounding_box = self.subject_box(frame);
        let at = |fx: f64, fy: f64| {
            Point::new(
                bounding_box.min_x + bounding_box.width() * fx,
                bounding_box.min_y + bounding_box.height() * fy,
            )
        };
        Ok(vec![FaceDetection {
            bounding_box,
            // Eyes, nose tip, mouth corners
            landmarks: vec![
                at(0.3, 0.35),
                at(0.7, 0.35),
                at(0.5, 0.55),
                at(0.35, 0.75),
                at(0.65, 0.75),
            ],
            probabilities: FaceProbabilities {
                left_eye_open: Some(0.9),
                right_eye_open: Some(0.9),
                smiling: Some(0.1),
                head_euler_angle_x: Some(0.0),
                head_euler_angle_y: Some(0.0),
                head_euler_angle_z: Some(0.0),
            },
        }])
    }
}

/// Reports the synthetic subject as a QR code carrying the frame number
pub struct SyntheticQrCodeDetector {
    faces: SyntheticFaceDetector,
}

impl SyntheticQrCodeDetector {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            faces: SyntheticFaceDetector::new(width, height),
        }
    }
}

impl QrCodeDetector for SyntheticQrCodeDetector {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<QrCodeDetection>, CaptureError> {
        Ok(vec![QrCodeDetection {
            value: format!("synthetic://frame/{}", frame.sequence),
            bounds: self.faces.subject_box(frame),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_capture::FrameSource;

    #[test]
    fn test_face_detector_tracks_subject() {
        let mut camera = SyntheticCamera::new(64, 64, 10, 2);
        let mut detector = SyntheticFaceDetector::new(64, 64);

        while let Some(frame) = camera.next_frame().unwrap() {
            let subject = camera.subject_at(frame.sequence);
            let faces = detector.detect(&frame).unwrap();
            assert_eq!(faces.len(), 1);
            assert_eq!(faces[0].bounding_box.min_x, subject.x as f64);
            assert_eq!(faces[0].bounding_box.width(), subject.size as f64);
            assert_eq!(faces[0].landmarks.len(), 5);
        }
    }

    #[test]
    fn test_qr_detector_value() {
        let frame = VideoFrame::filled(32, 32, [0, 0, 0], 0);
        let codes = SyntheticQrCodeDetector::new(32, 32).detect(&frame).unwrap();
        assert_eq!(codes[0].value, "synthetic://frame/0");
        assert!(!codes[0].bounds.is_empty());
    }
}
