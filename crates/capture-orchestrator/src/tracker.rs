//! Valid/invalid subject tracking

/// Remembers whether the tracked subject was valid on the last evaluated
/// frame so that losing it is reported once per transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectTracker {
    valid: bool,
    initially_valid: bool,
}

impl SubjectTracker {
    /// Tracker that reports nothing until the subject has been valid once
    pub fn new() -> Self {
        Self::starting_valid(false)
    }

    /// Tracker whose first rejection is reported even without a prior valid frame
    pub fn starting_valid(valid: bool) -> Self {
        Self {
            valid,
            initially_valid: valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true on an invalid to valid transition
    pub fn mark_valid(&mut self) -> bool {
        let changed = !self.valid;
        self.valid = true;
        changed
    }

    /// Returns true on a valid to invalid transition
    pub fn mark_invalid(&mut self) -> bool {
        let changed = self.valid;
        self.valid = false;
        changed
    }

    pub fn reset(&mut self) {
        self.valid = self.initially_valid;
    }
}

impl Default for SubjectTracker {
    fn default() -> Self {
        Self::new()
    }
}
