//! Policy rejection codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a detected subject was rejected, surfaced through `onMessage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Message {
    /// Subject width relative to the view (or ROI) is below the minimum
    #[serde(rename = "INVALID_MINIMUM_SIZE")]
    InvalidMinimumSize,

    /// Subject width relative to the view is above the maximum
    #[serde(rename = "INVALID_MAXIMUM_SIZE")]
    InvalidMaximumSize,

    /// Subject is outside the region of interest
    #[serde(rename = "INVALID_OUT_OF_ROI")]
    InvalidOutOfRoi,
}

impl Message {
    pub fn as_str(&self) -> &'static str {
        match self {
            Message::InvalidMinimumSize => "INVALID_MINIMUM_SIZE",
            Message::InvalidMaximumSize => "INVALID_MAXIMUM_SIZE",
            Message::InvalidOutOfRoi => "INVALID_OUT_OF_ROI",
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
