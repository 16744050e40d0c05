//! Per-stream frame gating

/// Interval between face detections
pub const DETECTION_INTERVAL_MS: i64 = 200;

/// Interval between QR code scans
pub const QR_CODE_INTERVAL_MS: i64 = 100;

/// Admits at most one frame per interval.
///
/// Frames arriving too soon after the last admitted one are dropped rather
/// than queued. Frames are delivered sequentially, so the gate is owned by
/// the orchestrator and needs no synchronization.
#[derive(Debug, Clone)]
pub struct FrameGate {
    interval_ms: i64,
    last_ms: Option<i64>,
}

impl FrameGate {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    pub fn interval_ms(&self) -> i64 {
        self.interval_ms
    }

    /// Admit a frame stamped `now_ms`; `false` if it must be dropped
    pub fn try_enter(&mut self, now_ms: i64) -> bool {
        if let Some(last) = self.last_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        true
    }

    /// Forget the last admission time
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval() {
        let mut gate = FrameGate::new(DETECTION_INTERVAL_MS);
        assert!(gate.try_enter(0));
        assert!(!gate.try_enter(100));
        assert!(!gate.try_enter(199));
        assert!(gate.try_enter(200));
    }

    #[test]
    fn test_dropped_frame_does_not_move_window() {
        let mut gate = FrameGate::new(QR_CODE_INTERVAL_MS);
        assert!(gate.try_enter(0));
        assert!(!gate.try_enter(90));
        assert!(gate.try_enter(100));
    }

    #[test]
    fn test_reset() {
        let mut gate = FrameGate::new(QR_CODE_INTERVAL_MS);
        assert!(gate.try_enter(50));
        assert!(!gate.try_enter(60));
        gate.reset();
        assert!(gate.try_enter(60));
    }
}
