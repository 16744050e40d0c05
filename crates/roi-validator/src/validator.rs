//! Detection box validator

use crate::Message;
use capture_options::CaptureOptions;
use geometry::Rect;
use tracing::trace;

/// Outcome of validating one detection box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    /// Subject may be captured
    Accepted,
    /// No usable detection (empty box or partly off screen); nothing to report
    RejectedSilently,
    /// Policy violation reported to the user
    Rejected(Message),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted)
    }

    /// Reason to surface, if any
    pub fn message(&self) -> Option<Message> {
        match self {
            ValidationResult::Rejected(message) => Some(*message),
            _ => None,
        }
    }
}

/// Validate a display-space detection box against a `view_width` x `view_height` view.
///
/// Size limits compare the box *width* only.
pub fn validate(
    detection_box: &Rect,
    view_width: f64,
    view_height: f64,
    options: &CaptureOptions,
) -> ValidationResult {
    if detection_box.is_empty() || !(view_width > 0.0 && view_height > 0.0) {
        return ValidationResult::RejectedSilently;
    }

    if !detection_box.is_inside(view_width, view_height) {
        trace!("Detection box {:?} extends past the view", detection_box);
        return ValidationResult::RejectedSilently;
    }

    let roi = &options.roi;
    if roi.enable {
        let top_offset = detection_box.min_y / view_height;
        let right_offset = (view_width - detection_box.max_x) / view_width;
        let bottom_offset = (view_height - detection_box.max_y) / view_height;
        let left_offset = detection_box.min_x / view_width;

        if roi.is_out_of(top_offset, right_offset, bottom_offset, left_offset) {
            return ValidationResult::Rejected(Message::InvalidOutOfRoi);
        }

        if roi.has_changes() {
            let roi_width = view_width * roi.width_fraction();
            let ratio = detection_box.width() / roi_width;
            if ratio < options.minimum_size {
                return ValidationResult::Rejected(Message::InvalidMinimumSize);
            }
        }

        return ValidationResult::Accepted;
    }

    let ratio = detection_box.width() / view_width;
    if ratio < options.minimum_size {
        return ValidationResult::Rejected(Message::InvalidMinimumSize);
    }
    if ratio > options.maximum_size {
        return ValidationResult::Rejected(Message::InvalidMaximumSize);
    }

    ValidationResult::Accepted
}

/// Validator bound to the current view size
#[derive(Debug, Clone, Copy)]
pub struct RoiValidator {
    view_width: f64,
    view_height: f64,
}

impl RoiValidator {
    pub fn new(view_width: f64, view_height: f64) -> Self {
        Self {
            view_width,
            view_height,
        }
    }

    /// Update after a layout change
    pub fn set_view_size(&mut self, view_width: f64, view_height: f64) {
        self.view_width = view_width;
        self.view_height = view_height;
    }

    pub fn view_size(&self) -> (f64, f64) {
        (self.view_width, self.view_height)
    }

    pub fn validate(&self, detection_box: &Rect, options: &CaptureOptions) -> ValidationResult {
        validate(detection_box, self.view_width, self.view_height, options)
    }

    /// Region of interest in view coordinates
    pub fn roi_rect(&self, options: &CaptureOptions) -> Rect {
        let roi = &options.roi;
        Rect::from_edges(
            self.view_width * roi.left_offset,
            self.view_height * roi.top_offset,
            self.view_width * (1.0 - roi.right_offset),
            self.view_height * (1.0 - roi.bottom_offset),
        )
    }
}
