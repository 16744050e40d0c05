//! Frame sources

use crate::{CameraError, VideoFrame};
use tracing::debug;

/// Sequential frame source (no reentrancy)
pub trait FrameSource {
    /// Next frame, or `None` once the stream is exhausted
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError>;
}

/// Square "subject" painted into synthetic frames, in frame pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticSubject {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Deterministic camera producing a mid-gray background with a textured
/// subject that drifts horizontally across the frame.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    frame_interval_ms: i64,
    max_frames: u32,
    sequence: u32,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32, fps: u32, max_frames: u32) -> Self {
        Self {
            width,
            height,
            frame_interval_ms: 1000 / fps.max(1) as i64,
            max_frames,
            sequence: 0,
        }
    }

    /// Subject position for a given frame sequence number
    pub fn subject_at(&self, sequence: u32) -> SyntheticSubject {
        let size = self.width.min(self.height) / 2;
        let travel = self.width.saturating_sub(size).max(1);
        // Triangle wave so the subject leaves and re-enters the centre
        let period = travel * 2;
        let phase = (sequence * 7) % period;
        let x = if phase < travel { phase } else { period - phase };
        SyntheticSubject {
            x,
            y: (self.height - size) / 2,
            size,
        }
    }

    fn render(&self, sequence: u32) -> VideoFrame {
        let subject = self.subject_at(sequence);
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                let inside = x >= subject.x
                    && x < subject.x + subject.size
                    && y >= subject.y
                    && y < subject.y + subject.size;
                let value = if inside {
                    // Checkerboard texture gives the subject real edges
                    if ((x - subject.x) / 4 + (y - subject.y) / 4) % 2 == 0 {
                        200
                    } else {
                        90
                    }
                } else {
                    128
                };
                data.extend_from_slice(&[value, value, value]);
            }
        }
        VideoFrame {
            data,
            width: self.width,
            height: self.height,
            timestamp_ms: sequence as i64 * self.frame_interval_ms,
            sequence,
        }
    }
}

impl FrameSource for SyntheticCamera {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError> {
        if self.sequence >= self.max_frames {
            return Ok(None);
        }
        let frame = self.render(self.sequence);
        debug!(sequence = self.sequence, "synthetic frame rendered");
        self.sequence += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_stream_ends() {
        let mut camera = SyntheticCamera::new(32, 32, 10, 3);
        let mut count = 0;
        while let Some(frame) = camera.next_frame().unwrap() {
            assert_eq!(frame.data.len(), 32 * 32 * 3);
            assert_eq!(frame.timestamp_ms, count as i64 * 100);
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_subject_stays_in_frame() {
        let camera = SyntheticCamera::new(64, 48, 30, 0);
        for sequence in 0..200 {
            let subject = camera.subject_at(sequence);
            assert!(subject.x + subject.size <= 64);
            assert!(subject.y + subject.size <= 48);
        }
    }
}
