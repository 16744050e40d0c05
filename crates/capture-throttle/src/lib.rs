//! Capture Rate Throttling
//!
//! One state machine per analyzer (face, frame) deciding when a captured
//! image may be emitted and when a limited capture run has finished.

mod throttle;

pub use throttle::{
    CaptureThrottle, SubjectKind, ThrottleDecision, ThrottleLimits, ThrottlePhase, ThrottleState,
};
