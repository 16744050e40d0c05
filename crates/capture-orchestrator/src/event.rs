//! Listener events

use capture_throttle::SubjectKind;
use geometry::Rect;
use quality_scorer::QualityMetrics;
use roi_validator::Message;
use serde::{Deserialize, Serialize};

/// Face classification values supplied by the detector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceProbabilities {
    pub left_eye_open: Option<f64>,
    pub right_eye_open: Option<f64>,
    pub smiling: Option<f64>,
    pub head_euler_angle_x: Option<f64>,
    pub head_euler_angle_y: Option<f64>,
    pub head_euler_angle_z: Option<f64>,
}

/// Everything the pipeline reports to the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum CaptureEvent {
    ImageCaptured {
        kind: SubjectKind,
        count: u32,
        /// 0 in unlimited mode
        total: u32,
        path: String,
        metrics: Option<QualityMetrics>,
    },
    /// Level-triggered: every processed frame while the face is valid
    FaceDetected {
        geometry: Rect,
        probabilities: FaceProbabilities,
    },
    FaceUndetected,
    QrCodeScanned {
        value: String,
    },
    EndCapture,
    Message(Message),
    Error(String),
    PermissionDenied,
}

impl CaptureEvent {
    /// Deliver to the matching listener callback
    pub fn dispatch(&self, listener: &dyn CameraEventListener) {
        match self {
            CaptureEvent::ImageCaptured {
                kind,
                count,
                total,
                path,
                metrics,
            } => listener.on_image_captured(*kind, *count, *total, path, metrics.as_ref()),
            CaptureEvent::FaceDetected {
                geometry,
                probabilities,
            } => listener.on_face_detected(geometry, probabilities),
            CaptureEvent::FaceUndetected => listener.on_face_undetected(),
            CaptureEvent::QrCodeScanned { value } => listener.on_qr_code_scanned(value),
            CaptureEvent::EndCapture => listener.on_end_capture(),
            CaptureEvent::Message(message) => listener.on_message(*message),
            CaptureEvent::Error(error) => listener.on_error(error),
            CaptureEvent::PermissionDenied => listener.on_permission_denied(),
        }
    }
}

/// Callbacks from the capture pipeline. Every method defaults to a no-op.
pub trait CameraEventListener: Send + Sync {
    fn on_image_captured(
        &self,
        _kind: SubjectKind,
        _count: u32,
        _total: u32,
        _path: &str,
        _metrics: Option<&QualityMetrics>,
    ) {
    }

    fn on_face_detected(&self, _geometry: &Rect, _probabilities: &FaceProbabilities) {}

    fn on_face_undetected(&self) {}

    fn on_qr_code_scanned(&self, _value: &str) {}

    fn on_end_capture(&self) {}

    fn on_message(&self, _message: Message) {}

    fn on_error(&self, _error: &str) {}

    fn on_permission_denied(&self) {}
}

/// Listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl CameraEventListener for NoopListener {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Calls(Mutex<Vec<String>>);

    impl CameraEventListener for Calls {
        fn on_image_captured(
            &self,
            kind: SubjectKind,
            count: u32,
            total: u32,
            path: &str,
            _metrics: Option<&QualityMetrics>,
        ) {
            self.0
                .lock()
                .unwrap()
                .push(format!("captured {kind} {count}/{total} {path}"));
        }

        fn on_message(&self, message: Message) {
            self.0.lock().unwrap().push(format!("message {message}"));
        }

        fn on_end_capture(&self) {
            self.0.lock().unwrap().push("end".to_string());
        }
    }

    #[test]
    fn test_dispatch_reaches_callbacks() {
        let calls = Calls::default();
        CaptureEvent::ImageCaptured {
            kind: SubjectKind::Face,
            count: 2,
            total: 5,
            path: "face-0001.jpg".to_string(),
            metrics: None,
        }
        .dispatch(&calls);
        CaptureEvent::Message(Message::InvalidOutOfRoi).dispatch(&calls);
        CaptureEvent::EndCapture.dispatch(&calls);
        // Not overridden
        CaptureEvent::FaceUndetected.dispatch(&calls);

        assert_eq!(
            *calls.0.lock().unwrap(),
            vec![
                "captured face 2/5 face-0001.jpg",
                "message INVALID_OUT_OF_ROI",
                "end"
            ]
        );
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(CaptureEvent::Message(Message::InvalidMinimumSize)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": "message", "data": "INVALID_MINIMUM_SIZE" })
        );
        let json = serde_json::to_value(CaptureEvent::EndCapture).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "end_capture" }));
    }
}
