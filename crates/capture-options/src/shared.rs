//! Shared options handle

use crate::{CaptureOptions, ConfigError};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// The single options instance shared by the UI surface and the pipeline.
///
/// The pipeline reads through [`SharedOptions::snapshot`] once per frame so a
/// concurrent setter cannot change values halfway through a validation pass.
#[derive(Debug, Clone, Default)]
pub struct SharedOptions {
    inner: Arc<RwLock<CaptureOptions>>,
}

impl SharedOptions {
    pub fn new(options: CaptureOptions) -> Self {
        Self {
            inner: Arc::new(RwLock::new(options)),
        }
    }

    /// Copy of the current options
    pub fn snapshot(&self) -> CaptureOptions {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply a (validated) mutation under the write lock
    pub fn update<F>(&self, mutate: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut CaptureOptions) -> Result<(), ConfigError>,
    {
        let mut options = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let result = mutate(&mut options);
        if let Err(e) = &result {
            debug!("Rejected option update: {}", e);
        }
        result
    }

    /// Apply a mutation that cannot fail, e.g. assigning an already typed value
    pub fn modify<F, R>(&self, mutate: F) -> R
    where
        F: FnOnce(&mut CaptureOptions) -> R,
    {
        let mut options = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        mutate(&mut options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaptureType;

    #[test]
    fn test_snapshot_is_a_copy() {
        let shared = SharedOptions::default();
        let before = shared.snapshot();

        shared
            .update(|o| o.set_capture_type("face"))
            .unwrap();

        assert_eq!(before.capture_type, CaptureType::None);
        assert_eq!(shared.snapshot().capture_type, CaptureType::Face);
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedOptions::default();
        let ui_handle = shared.clone();
        ui_handle
            .update(|o| {
                o.set_roi_enable(true);
                o.set_roi_top_offset(0.2)
            })
            .unwrap();
        let snapshot = shared.snapshot();
        assert!(snapshot.roi.enable);
        assert!((snapshot.roi.top_offset - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failed_update_reports_key() {
        let shared = SharedOptions::default();
        let err = shared.update(|o| o.set_maximum_size(2.0)).unwrap_err();
        assert_eq!(err.key(), "INVALID_MAXIMUM_SIZE");
        assert!((shared.snapshot().maximum_size - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_modify_returns_value() {
        let shared = SharedOptions::default();
        let lens = shared.modify(|o| {
            o.camera_lens = o.camera_lens.toggled();
            o.camera_lens
        });
        assert_eq!(lens, crate::CameraLens::Back);
        assert_eq!(shared.snapshot().camera_lens, crate::CameraLens::Back);
    }
}
