//! Overlay geometry for the preview

use capture_options::{CaptureOptions, Color};
use geometry::{Point, Rect};
use serde::Serialize;

/// Shapes the UI should draw over the preview, in view coordinates.
///
/// Empty whenever no valid subject is tracked.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Overlay {
    pub detection_box: Option<Rect>,
    pub detection_box_color: Option<Color>,
    pub contours: Vec<Point>,
    pub contours_color: Option<Color>,
    /// Region of interest to shade outside of
    pub roi_area: Option<Rect>,
    pub roi_area_color: Option<Color>,
}

impl Overlay {
    /// Overlay for a valid subject, honouring the drawing options
    pub fn for_subject(
        detection_box: Rect,
        contours: Vec<Point>,
        roi_area: Rect,
        options: &CaptureOptions,
    ) -> Self {
        let mut overlay = Self::default();
        if options.detection_box {
            overlay.detection_box = Some(detection_box);
            overlay.detection_box_color = Some(options.detection_box_color);
        }
        if options.face_contours && !contours.is_empty() {
            overlay.contours = contours;
            overlay.contours_color = Some(options.face_contours_color);
        }
        if options.roi.enable && options.roi.area_offset_enable {
            overlay.roi_area = Some(roi_area);
            overlay.roi_area_color = Some(options.roi.area_offset_color);
        }
        overlay
    }

    pub fn is_empty(&self) -> bool {
        self.detection_box.is_none() && self.contours.is_empty() && self.roi_area.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> (Rect, Vec<Point>, Rect) {
        (
            Rect::from_xywh(10.0, 10.0, 50.0, 50.0),
            vec![Point::new(20.0, 20.0), Point::new(30.0, 25.0)],
            Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        )
    }

    #[test]
    fn test_default_options_draw_box_only() {
        let (rect, contours, roi) = subject();
        let overlay = Overlay::for_subject(rect, contours, roi, &CaptureOptions::default());
        assert_eq!(overlay.detection_box, Some(rect));
        assert_eq!(overlay.detection_box_color, Some(Color::WHITE));
        assert!(overlay.contours.is_empty());
        assert!(overlay.roi_area.is_none());
    }

    #[test]
    fn test_contours_and_roi_area() {
        let (rect, contours, roi) = subject();
        let mut options = CaptureOptions::default();
        options.detection_box = false;
        options.face_contours = true;
        options.roi.enable = true;
        options.roi.area_offset_enable = true;

        let mut overlay = Overlay::for_subject(rect, contours.clone(), roi, &options);
        assert!(overlay.detection_box.is_none());
        assert_eq!(overlay.contours, contours);
        assert_eq!(overlay.roi_area, Some(roi));
        assert!(!overlay.is_empty());

        overlay.clear();
        assert!(overlay.is_empty());
    }
}
