use serde::{Deserialize, Serialize};

/// ARGB color used for overlay drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    /// Build from untrusted channel values; `None` if any channel is outside [0, 255]
    pub fn from_argb(alpha: i64, red: i64, green: i64, blue: i64) -> Option<Self> {
        let channel = |v: i64| u8::try_from(v).ok();
        Some(Self::new(
            channel(alpha)?,
            channel(red)?,
            channel(green)?,
            channel(blue)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argb_range() {
        assert_eq!(Color::from_argb(255, 255, 255, 255), Some(Color::WHITE));
        assert_eq!(Color::from_argb(0, 0, 0, 0), Some(Color::new(0, 0, 0, 0)));
        assert!(Color::from_argb(256, 0, 0, 0).is_none());
        assert!(Color::from_argb(0, -1, 0, 0).is_none());
    }
}
