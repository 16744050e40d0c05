use serde::{Deserialize, Serialize};

/// 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle stored by its edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Rectangle from two x and two y edges in any order
    pub fn from_edges(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_edges(x, y, x + width, y + height)
    }

    /// "No detection" sentinel
    pub fn nan() -> Self {
        Self {
            min_x: f64::NAN,
            min_y: f64::NAN,
            max_x: f64::NAN,
            max_y: f64::NAN,
        }
    }

    pub fn is_nan(&self) -> bool {
        self.min_x.is_nan() || self.min_y.is_nan() || self.max_x.is_nan() || self.max_y.is_nan()
    }

    /// NaN or zero-area
    pub fn is_empty(&self) -> bool {
        self.is_nan() || self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow by `percentage` of the size, split evenly between opposite sides
    pub fn increased(&self, percentage: f64) -> Self {
        let dx = self.width() * percentage / 2.0;
        let dy = self.height() * percentage / 2.0;
        Self {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Mirror across the vertical centre line of a view `view_width` wide
    pub fn mirrored_x(&self, view_width: f64) -> Self {
        Self::from_edges(
            view_width - self.max_x,
            self.min_y,
            view_width - self.min_x,
            self.max_y,
        )
    }

    /// Whether every edge lies within `[0, width] x [0, height]`
    pub fn is_inside(&self, width: f64, height: f64) -> bool {
        self.min_x >= 0.0 && self.min_y >= 0.0 && self.max_x <= width && self.max_y <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_normalizes() {
        let rect = Rect::from_edges(10.0, 40.0, 2.0, 5.0);
        assert_eq!(rect, Rect::from_xywh(2.0, 5.0, 8.0, 35.0));
        assert_eq!(rect.width(), 8.0);
    }

    #[test]
    fn test_nan_is_empty() {
        assert!(Rect::nan().is_nan());
        assert!(Rect::nan().is_empty());
        assert!(Rect::from_xywh(1.0, 1.0, 0.0, 5.0).is_empty());
        assert!(!Rect::from_xywh(1.0, 1.0, 2.0, 5.0).is_empty());
    }

    #[test]
    fn test_increased() {
        let rect = Rect::from_xywh(10.0, 10.0, 100.0, 50.0).increased(0.2);
        assert_eq!(rect, Rect::from_edges(0.0, 5.0, 120.0, 65.0));
    }

    #[test]
    fn test_mirrored_twice_is_identity() {
        let rect = Rect::from_xywh(12.0, 3.0, 40.0, 20.0);
        assert_eq!(rect.mirrored_x(100.0), Rect::from_xywh(48.0, 3.0, 40.0, 20.0));
        assert_eq!(rect.mirrored_x(100.0).mirrored_x(100.0), rect);
    }
}
