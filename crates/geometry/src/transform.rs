//! Detector-space to display-space transforms

use crate::{Point, Rect};
use camera_capture::CameraLens;

/// Scale and mirror parameters for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    pub image_width: f64,
    pub image_height: f64,
    pub view_width: f64,
    pub view_height: f64,
    pub lens: CameraLens,
}

impl DisplayTransform {
    pub fn new(
        image_width: f64,
        image_height: f64,
        view_width: f64,
        view_height: f64,
        lens: CameraLens,
    ) -> Self {
        Self {
            image_width,
            image_height,
            view_width,
            view_height,
            lens,
        }
    }

    /// `(scale_x, scale_y)`, or `None` for a degenerate image.
    ///
    /// Cross-scaled: x uses the height ratio and y the width ratio.
    pub fn scale(&self) -> Option<(f64, f64)> {
        if !(self.image_width > 0.0 && self.image_height > 0.0) {
            return None;
        }
        Some((
            self.view_height / self.image_height,
            self.view_width / self.image_width,
        ))
    }

    fn map_x(&self, x: f64, scale_x: f64) -> f64 {
        let scaled = x * scale_x;
        if self.lens.is_mirrored() {
            self.view_width - scaled
        } else {
            scaled
        }
    }

    /// Detector box in display coordinates, or [`Rect::nan`] if the image is degenerate
    pub fn to_display_rect(&self, detector_box: &Rect) -> Rect {
        let Some((scale_x, scale_y)) = self.scale() else {
            return Rect::nan();
        };
        if detector_box.is_nan() {
            return Rect::nan();
        }
        Rect::from_edges(
            self.map_x(detector_box.min_x, scale_x),
            detector_box.min_y * scale_y,
            self.map_x(detector_box.max_x, scale_x),
            detector_box.max_y * scale_y,
        )
    }

    /// Landmark points in display coordinates, order preserved
    pub fn to_display_points(&self, points: &[Point]) -> Vec<Point> {
        let Some((scale_x, scale_y)) = self.scale() else {
            return Vec::new();
        };
        points
            .iter()
            .map(|p| Point::new(self.map_x(p.x, scale_x), p.y * scale_y))
            .collect()
    }
}

/// See [`DisplayTransform::to_display_rect`]
pub fn to_display_rect(
    detector_box: &Rect,
    image_width: f64,
    image_height: f64,
    view_width: f64,
    view_height: f64,
    lens: CameraLens,
) -> Rect {
    DisplayTransform::new(image_width, image_height, view_width, view_height, lens)
        .to_display_rect(detector_box)
}

/// See [`DisplayTransform::to_display_points`]
pub fn to_display_points(
    points: &[Point],
    image_width: f64,
    image_height: f64,
    view_width: f64,
    view_height: f64,
    lens: CameraLens,
) -> Vec<Point> {
    DisplayTransform::new(image_width, image_height, view_width, view_height, lens)
        .to_display_points(points)
}
