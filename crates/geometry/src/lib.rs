//! Display Geometry
//!
//! Maps detector-space rectangles and landmark points into display
//! coordinates. The camera sensor is rotated 90° relative to the display, so
//! the x-axis scale comes from the height ratio and the y-axis scale from the
//! width ratio. Front-lens output is mirrored horizontally.

mod rect;
mod transform;

pub use rect::{Point, Rect};
pub use transform::{to_display_points, to_display_rect, DisplayTransform};
