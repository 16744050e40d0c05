//! Luminance histogram

use camera_capture::GrayFrame;

/// Last bin counted as dark (inclusive)
pub const DARK_MAX_BIN: usize = 35;

/// First bin counted as light (inclusive)
pub const LIGHT_MIN_BIN: usize = 220;

/// 256-bin luminance histogram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u64; 256],
    total: u64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            bins: [0; 256],
            total: 0,
        }
    }
}

impl Histogram {
    pub fn from_plane(plane: &GrayFrame) -> Self {
        Self::from_values(&plane.data)
    }

    pub fn from_values(values: &[u8]) -> Self {
        let mut histogram = Self::default();
        for &v in values {
            histogram.bins[v as usize] += 1;
        }
        histogram.total = values.len() as u64;
        histogram
    }

    /// Histogram from raw bin counts
    pub fn from_bins(bins: [u64; 256]) -> Self {
        let total = bins.iter().sum();
        Self { bins, total }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn bin(&self, index: u8) -> u64 {
        self.bins[index as usize]
    }

    fn share(&self, lo: usize, hi: usize) -> f64 {
        let count: u64 = self.bins[lo..=hi].iter().sum();
        count as f64 / self.total as f64
    }

    /// `(darkness, lightness)`, or `None` for an empty histogram
    pub fn illumination(&self) -> Option<(f64, f64)> {
        if self.total == 0 {
            return None;
        }
        Some((self.share(0, DARK_MAX_BIN), self.share(LIGHT_MIN_BIN, 255)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DARKNESS_THRESHOLD, LIGHTNESS_THRESHOLD};
    use proptest::prelude::*;

    #[test]
    fn test_counts() {
        let histogram = Histogram::from_values(&[0, 0, 35, 36, 219, 220, 255]);
        assert_eq!(histogram.total(), 7);
        assert_eq!(histogram.bin(0), 2);
        let (darkness, lightness) = histogram.illumination().unwrap();
        assert!((darkness - 3.0 / 7.0).abs() < 1e-12);
        assert!((lightness - 2.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_has_no_illumination() {
        assert!(Histogram::default().illumination().is_none());
    }

    fn tail_histogram(tail_bin: usize, tail_pct: u64) -> Histogram {
        let mut bins = [0u64; 256];
        bins[tail_bin] = tail_pct;
        bins[128] = 100 - tail_pct;
        Histogram::from_bins(bins)
    }

    proptest! {
        #[test]
        fn prop_dark_mass_rejects(bin in 0usize..=DARK_MAX_BIN, pct in 41u64..=100) {
            let (darkness, _) = tail_histogram(bin, pct).illumination().unwrap();
            prop_assert!(darkness > DARKNESS_THRESHOLD);
        }

        #[test]
        fn prop_light_mass_rejects(bin in LIGHT_MIN_BIN..=255usize, pct in 66u64..=100) {
            let (_, lightness) = tail_histogram(bin, pct).illumination().unwrap();
            prop_assert!(lightness > LIGHTNESS_THRESHOLD);
        }

        #[test]
        fn prop_middle_mass_passes(bin in (DARK_MAX_BIN + 1)..LIGHT_MIN_BIN, count in 1u64..10_000) {
            let mut bins = [0u64; 256];
            bins[bin] = count;
            let (darkness, lightness) = Histogram::from_bins(bins).illumination().unwrap();
            prop_assert_eq!(darkness, 0.0);
            prop_assert_eq!(lightness, 0.0);
        }
    }
}
