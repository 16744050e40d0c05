//! Detector capabilities

use crate::{CaptureError, FaceProbabilities};
use camera_capture::VideoFrame;
use geometry::{Point, Rect};

/// One face found in a frame, in frame pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDetection {
    pub bounding_box: Rect,
    /// Contour points in frame pixels
    pub landmarks: Vec<Point>,
    pub probabilities: FaceProbabilities,
}

impl FaceDetection {
    pub fn new(bounding_box: Rect) -> Self {
        Self {
            bounding_box,
            landmarks: Vec::new(),
            probabilities: FaceProbabilities::default(),
        }
    }
}

/// One decoded QR code, bounds in frame pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct QrCodeDetection {
    pub value: String,
    pub bounds: Rect,
}

/// Face detection capability
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<FaceDetection>, CaptureError>;
}

/// QR code detection capability
pub trait QrCodeDetector: Send {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<QrCodeDetection>, CaptureError>;
}

fn widest<'a, T>(items: &'a [T], bounds: impl Fn(&T) -> &Rect) -> Option<&'a T> {
    items
        .iter()
        .filter(|item| !bounds(*item).is_nan())
        .fold(None, |best: Option<&T>, item| match best {
            Some(current) if bounds(current).width() >= bounds(item).width() => Some(current),
            _ => Some(item),
        })
}

/// The closest face, i.e. the widest one
pub fn closest_face(faces: &[FaceDetection]) -> Option<&FaceDetection> {
    widest(faces, |face| &face.bounding_box)
}

/// The closest QR code, i.e. the widest one
pub fn closest_qr_code(codes: &[QrCodeDetection]) -> Option<&QrCodeDetection> {
    widest(codes, |code| &code.bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_face_is_widest() {
        let faces = vec![
            FaceDetection::new(Rect::from_xywh(0.0, 0.0, 20.0, 90.0)),
            FaceDetection::new(Rect::from_xywh(50.0, 0.0, 40.0, 10.0)),
            FaceDetection::new(Rect::from_xywh(10.0, 10.0, 30.0, 30.0)),
        ];
        let closest = closest_face(&faces).unwrap();
        assert_eq!(closest.bounding_box.min_x, 50.0);
    }

    #[test]
    fn test_ties_keep_first() {
        let codes = vec![
            QrCodeDetection {
                value: "a".into(),
                bounds: Rect::from_xywh(0.0, 0.0, 10.0, 10.0),
            },
            QrCodeDetection {
                value: "b".into(),
                bounds: Rect::from_xywh(20.0, 0.0, 10.0, 10.0),
            },
        ];
        assert_eq!(closest_qr_code(&codes).unwrap().value, "a");
    }

    #[test]
    fn test_nan_boxes_ignored() {
        assert!(closest_face(&[]).is_none());
        assert!(closest_face(&[FaceDetection::new(Rect::nan())]).is_none());
    }
}
