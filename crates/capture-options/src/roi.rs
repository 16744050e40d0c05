//! Region of interest

use crate::Color;
use serde::{Deserialize, Serialize};

/// Region of interest expressed as fractional insets from each view edge.
///
/// `left_offset + right_offset < 1` and `top_offset + bottom_offset < 1` are
/// required for a non-degenerate region; this is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roi {
    /// Enable or disable the region of interest
    pub enable: bool,

    /// Inset from the top edge, in [0, 1]
    pub top_offset: f64,
    /// Inset from the right edge, in [0, 1]
    pub right_offset: f64,
    /// Inset from the bottom edge, in [0, 1]
    pub bottom_offset: f64,
    /// Inset from the left edge, in [0, 1]
    pub left_offset: f64,

    /// Draw the area outside the region
    pub area_offset_enable: bool,
    pub area_offset_color: Color,
}

impl Default for Roi {
    fn default() -> Self {
        Self {
            enable: false,
            top_offset: 0.0,
            right_offset: 0.0,
            bottom_offset: 0.0,
            left_offset: 0.0,
            area_offset_enable: false,
            area_offset_color: Color::new(100, 255, 255, 255),
        }
    }
}

impl Roi {
    /// Whether any inset is configured
    pub fn has_changes(&self) -> bool {
        self.top_offset != 0.0
            || self.right_offset != 0.0
            || self.bottom_offset != 0.0
            || self.left_offset != 0.0
    }

    /// Whether a subject with the given edge offsets sits closer to any view
    /// edge than this region allows
    pub fn is_out_of(
        &self,
        top_offset: f64,
        right_offset: f64,
        bottom_offset: f64,
        left_offset: f64,
    ) -> bool {
        self.top_offset > top_offset
            || self.right_offset > right_offset
            || self.bottom_offset > bottom_offset
            || self.left_offset > left_offset
    }

    /// Fraction of the view width covered by the region
    pub fn width_fraction(&self) -> f64 {
        1.0 - self.right_offset - self.left_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_changes() {
        let mut roi = Roi::default();
        assert!(!roi.has_changes());
        roi.bottom_offset = 0.2;
        assert!(roi.has_changes());
    }

    #[test]
    fn test_is_out_of() {
        let roi = Roi {
            top_offset: 0.1,
            ..Default::default()
        };
        assert!(roi.is_out_of(0.05, 0.5, 0.5, 0.5));
        assert!(!roi.is_out_of(0.15, 0.0, 0.0, 0.0));
        // Touching the boundary is inside
        assert!(!roi.is_out_of(0.1, 0.0, 0.0, 0.0));
    }
}
