//! Capture throttle state machine

use capture_options::CaptureOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Analyzer a throttle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Face,
    Frame,
}

impl SubjectKind {
    /// Count cycle length in unlimited mode
    pub fn wrap(self) -> u32 {
        match self {
            SubjectKind::Face => 40,
            SubjectKind::Frame => 25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubjectKind::Face => "face",
            SubjectKind::Frame => "frame",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count and interval limits taken from the capture options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThrottleLimits {
    /// 0 means unlimited
    pub number_of_images: u32,
    pub time_between_images_ms: u64,
}

impl ThrottleLimits {
    pub fn new(number_of_images: u32, time_between_images_ms: u64) -> Self {
        Self {
            number_of_images,
            time_between_images_ms,
        }
    }

    pub fn from_options(options: &CaptureOptions) -> Self {
        Self::new(options.number_of_images, options.time_between_images_ms)
    }

    pub fn is_limited(&self) -> bool {
        self.number_of_images > 0
    }

    fn running_phase(&self) -> ThrottlePhase {
        if self.is_limited() {
            ThrottlePhase::LimitedRunning
        } else {
            ThrottlePhase::Running
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThrottlePhase {
    #[default]
    Idle,
    Running,
    LimitedRunning,
    /// Limited run finished; waits for the next `start`
    Ended,
}

/// Mutable throttle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThrottleState {
    /// `None` until the first slot of a run is taken
    pub last_emit_ms: Option<i64>,
    pub images_emitted: u32,
    pub phase: ThrottlePhase,
}

/// What a capture turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Interval not elapsed or throttle not running
    Suppressed,
    /// Emit `ImageCaptured`; `total` is 0 in unlimited mode
    Captured { count: u32, total: u32 },
    /// Limited run is complete; the analyzer must stop
    EndCapture,
}

/// Per-analyzer capture throttle.
///
/// Taking a slot ([`try_acquire`](Self::try_acquire)) and counting the
/// capture ([`record_capture`](Self::record_capture)) are separate so a slot
/// can be reserved when a save is dispatched and counted when it completes.
#[derive(Debug, Clone)]
pub struct CaptureThrottle {
    kind: SubjectKind,
    limits: ThrottleLimits,
    state: ThrottleState,
}

impl CaptureThrottle {
    pub fn new(kind: SubjectKind) -> Self {
        Self {
            kind,
            limits: ThrottleLimits::default(),
            state: ThrottleState::default(),
        }
    }

    pub fn kind(&self) -> SubjectKind {
        self.kind
    }

    pub fn limits(&self) -> ThrottleLimits {
        self.limits
    }

    pub fn state(&self) -> ThrottleState {
        self.state
    }

    pub fn phase(&self) -> ThrottlePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state.phase,
            ThrottlePhase::Running | ThrottlePhase::LimitedRunning
        )
    }

    /// Begin a run; counters reset
    pub fn start(&mut self, limits: ThrottleLimits) {
        self.limits = limits;
        self.state = ThrottleState {
            last_emit_ms: None,
            images_emitted: 0,
            phase: limits.running_phase(),
        };
        info!(
            "{} throttle started: {:?} (images={}, interval={}ms)",
            self.kind, self.state.phase, limits.number_of_images, limits.time_between_images_ms
        );
    }

    /// Back to idle; counters reset, nothing emitted
    pub fn stop(&mut self) {
        if self.state.phase != ThrottlePhase::Idle {
            info!("{} throttle stopped", self.kind);
        }
        self.state = ThrottleState::default();
    }

    /// Pick up option changes made while running
    pub fn set_limits(&mut self, limits: ThrottleLimits) {
        self.limits = limits;
        if self.is_running() {
            self.state.phase = limits.running_phase();
        }
    }

    /// Index to name the next persisted image with
    pub fn next_index(&self) -> u32 {
        self.state.images_emitted
    }

    /// Reserve the emission slot at `now_ms` if the interval has elapsed
    pub fn try_acquire(&mut self, now_ms: i64) -> bool {
        if !self.is_running() {
            return false;
        }
        if let Some(last) = self.state.last_emit_ms {
            let elapsed = now_ms.saturating_sub(last);
            // A clock that stepped backwards counts as no time elapsed
            let too_soon = u64::try_from(elapsed)
                .map_or(true, |elapsed| elapsed < self.limits.time_between_images_ms);
            if too_soon {
                debug!(
                    "{} capture suppressed: {}ms since last",
                    self.kind, elapsed
                );
                return false;
            }
        }
        self.state.last_emit_ms = Some(now_ms);
        true
    }

    /// Count a completed capture taken in an acquired slot
    pub fn record_capture(&mut self) -> ThrottleDecision {
        match self.state.phase {
            ThrottlePhase::Running => {
                // Cycles 1..=wrap
                let count = self.state.images_emitted % self.kind.wrap() + 1;
                self.state.images_emitted = count;
                ThrottleDecision::Captured { count, total: 0 }
            }
            ThrottlePhase::LimitedRunning => {
                let total = self.limits.number_of_images;
                if self.state.images_emitted < total {
                    self.state.images_emitted += 1;
                    return ThrottleDecision::Captured {
                        count: self.state.images_emitted,
                        total,
                    };
                }
                self.state.images_emitted = 0;
                self.state.phase = ThrottlePhase::Ended;
                info!("{} capture ended after {} images", self.kind, total);
                ThrottleDecision::EndCapture
            }
            ThrottlePhase::Idle | ThrottlePhase::Ended => ThrottleDecision::Suppressed,
        }
    }

    /// [`try_acquire`](Self::try_acquire) then [`record_capture`](Self::record_capture)
    pub fn try_emit(&mut self, now_ms: i64) -> ThrottleDecision {
        if !self.try_acquire(now_ms) {
            return ThrottleDecision::Suppressed;
        }
        self.record_capture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn started(kind: SubjectKind, images: u32, interval_ms: u64) -> CaptureThrottle {
        let mut throttle = CaptureThrottle::new(kind);
        throttle.start(ThrottleLimits::new(images, interval_ms));
        throttle
    }

    #[test]
    fn test_idle_never_emits() {
        let mut throttle = CaptureThrottle::new(SubjectKind::Face);
        assert_eq!(throttle.try_emit(0), ThrottleDecision::Suppressed);
        assert_eq!(throttle.phase(), ThrottlePhase::Idle);
    }

    #[test]
    fn test_start_selects_phase() {
        assert_eq!(started(SubjectKind::Face, 0, 0).phase(), ThrottlePhase::Running);
        assert_eq!(
            started(SubjectKind::Face, 2, 0).phase(),
            ThrottlePhase::LimitedRunning
        );
    }

    #[test]
    fn test_interval_boundary_is_allowed() {
        let mut throttle = started(SubjectKind::Frame, 0, 500);
        assert!(throttle.try_acquire(100));
        assert!(!throttle.try_acquire(599));
        assert!(throttle.try_acquire(600));
    }

    #[test]
    fn test_interval_beyond_i64_still_suppresses() {
        let mut throttle = started(SubjectKind::Face, 0, u64::MAX);
        assert_eq!(
            throttle.try_emit(0),
            ThrottleDecision::Captured { count: 1, total: 0 }
        );
        assert_eq!(throttle.try_emit(1), ThrottleDecision::Suppressed);
        assert_eq!(throttle.try_emit(i64::MAX), ThrottleDecision::Suppressed);
    }

    #[test]
    fn test_clock_going_backwards_suppresses() {
        let mut throttle = started(SubjectKind::Frame, 0, 0);
        assert!(throttle.try_acquire(1000));
        assert!(!throttle.try_acquire(999));
        assert!(throttle.try_acquire(1000));
    }

    #[test]
    fn test_scenario_limited_face_capture() {
        let mut throttle = started(SubjectKind::Face, 3, 1000);
        let mut events = Vec::new();
        for t in (0..=4000).step_by(100) {
            match throttle.try_emit(t) {
                ThrottleDecision::Suppressed => {}
                decision => events.push((t, decision)),
            }
        }
        assert_eq!(
            events,
            vec![
                (0, ThrottleDecision::Captured { count: 1, total: 3 }),
                (1000, ThrottleDecision::Captured { count: 2, total: 3 }),
                (2000, ThrottleDecision::Captured { count: 3, total: 3 }),
                (3000, ThrottleDecision::EndCapture),
            ]
        );
        assert_eq!(throttle.phase(), ThrottlePhase::Ended);
        assert_eq!(throttle.state().images_emitted, 0);
    }

    #[test]
    fn test_restart_after_end() {
        let mut throttle = started(SubjectKind::Frame, 1, 0);
        assert_eq!(
            throttle.try_emit(0),
            ThrottleDecision::Captured { count: 1, total: 1 }
        );
        assert_eq!(throttle.try_emit(1), ThrottleDecision::EndCapture);
        assert_eq!(throttle.try_emit(2), ThrottleDecision::Suppressed);

        throttle.start(ThrottleLimits::new(0, 0));
        assert_eq!(
            throttle.try_emit(3),
            ThrottleDecision::Captured { count: 1, total: 0 }
        );
    }

    #[test]
    fn test_stop_resets() {
        let mut throttle = started(SubjectKind::Face, 0, 0);
        throttle.try_emit(0);
        throttle.try_emit(1);
        throttle.stop();
        assert_eq!(throttle.state(), ThrottleState::default());
        assert_eq!(throttle.record_capture(), ThrottleDecision::Suppressed);
    }

    #[test]
    fn test_reserved_slot_counts_later() {
        let mut throttle = started(SubjectKind::Face, 0, 1000);
        assert!(throttle.try_acquire(0));
        assert_eq!(throttle.next_index(), 0);
        // Save still pending; the slot is taken
        assert!(!throttle.try_acquire(500));
        assert_eq!(
            throttle.record_capture(),
            ThrottleDecision::Captured { count: 1, total: 0 }
        );
        assert_eq!(throttle.next_index(), 1);
    }

    #[test]
    fn test_set_limits_while_running() {
        let mut throttle = started(SubjectKind::Face, 0, 0);
        throttle.set_limits(ThrottleLimits::new(5, 0));
        assert_eq!(throttle.phase(), ThrottlePhase::LimitedRunning);

        let mut idle = CaptureThrottle::new(SubjectKind::Face);
        idle.set_limits(ThrottleLimits::new(5, 0));
        assert_eq!(idle.phase(), ThrottlePhase::Idle);
    }

    proptest! {
        #[test]
        fn prop_unlimited_wraps_to_one(
            face in any::<bool>(),
            captures in 1usize..200,
        ) {
            let kind = if face { SubjectKind::Face } else { SubjectKind::Frame };
            let mut throttle = started(kind, 0, 0);
            let wrap = kind.wrap() as usize;
            for i in 0..captures {
                match throttle.try_emit(i as i64) {
                    ThrottleDecision::Captured { count, total } => {
                        prop_assert_eq!(total, 0);
                        prop_assert!(count >= 1);
                        prop_assert_eq!(count as usize, i % wrap + 1);
                    }
                    other => prop_assert!(false, "unexpected {:?}", other),
                }
            }
        }

        #[test]
        fn prop_limited_run_terminates(n in 1u32..60, extra in 1usize..20) {
            let mut throttle = started(SubjectKind::Face, n, 0);
            let mut captured = Vec::new();
            let mut ends = 0;
            for t in 0..(n as usize + 1 + extra) {
                match throttle.try_emit(t as i64) {
                    ThrottleDecision::Captured { count, total } => {
                        prop_assert_eq!(total, n);
                        prop_assert_eq!(ends, 0);
                        captured.push(count);
                    }
                    ThrottleDecision::EndCapture => ends += 1,
                    ThrottleDecision::Suppressed => {}
                }
            }
            prop_assert_eq!(captured, (1..=n).collect::<Vec<_>>());
            prop_assert_eq!(ends, 1);
        }
    }
}
