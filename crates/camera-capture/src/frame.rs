//! Video frame types and processing

use crate::CameraError;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Rec. 709 luma coefficients used for the grayscale plane
const LUMA_RED: f32 = 0.2126;
const LUMA_GREEN: f32 = 0.7152;
const LUMA_BLUE: f32 = 0.0722;

/// Integer pixel rectangle in frame coordinates (may lie partly outside the frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRegion {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the region is non-empty and lies fully inside a `width` x `height` frame
    pub fn fits_in(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x >= 0
            && self.y >= 0
            && self.x + self.width <= width as i64
            && self.y + self.height <= height as i64
    }
}

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (milliseconds)
    pub timestamp_ms: i64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        timestamp_ms: i64,
        sequence: u32,
    ) -> Result<Self, CameraError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(CameraError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            timestamp_ms,
            sequence,
        })
    }

    /// Frame filled with a single color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], timestamp_ms: i64) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            data,
            width,
            height,
            timestamp_ms,
            sequence: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize * self.width as usize) + x as usize) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Convert to a grayscale luma plane
    pub fn to_grayscale(&self) -> GrayFrame {
        let data = self
            .data
            .chunks_exact(3)
            .map(|pixel| {
                let y = pixel[0] as f32 * LUMA_RED
                    + pixel[1] as f32 * LUMA_GREEN
                    + pixel[2] as f32 * LUMA_BLUE;
                y.round().min(255.0) as u8
            })
            .collect();
        GrayFrame {
            data,
            width: self.width,
            height: self.height,
        }
    }

    /// Copy the frame into an `image` buffer
    pub fn to_image(&self) -> Result<RgbImage, CameraError> {
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            CameraError::BufferSize {
                expected: self.width as usize * self.height as usize * 3,
                actual: self.data.len(),
            },
        )
    }

    /// Full frame as an image, horizontally flipped when `mirrored`
    pub fn to_oriented_image(&self, mirrored: bool) -> Result<RgbImage, CameraError> {
        let image = self.to_image()?;
        if mirrored {
            Ok(imageops::flip_horizontal(&image))
        } else {
            Ok(image)
        }
    }

    /// Crop a region of the frame and resize it to `out_width` x `out_height`
    pub fn crop_and_resize(
        &self,
        region: PixelRegion,
        out_width: u32,
        out_height: u32,
    ) -> Result<RgbImage, CameraError> {
        if out_width == 0 || out_height == 0 {
            return Err(CameraError::InvalidOutputSize {
                width: out_width,
                height: out_height,
            });
        }
        if !region.fits_in(self.width, self.height) {
            return Err(CameraError::CropOutOfBounds {
                region,
                width: self.width,
                height: self.height,
            });
        }

        let image = self.to_image()?;
        let cropped = imageops::crop_imm(
            &image,
            region.x as u32,
            region.y as u32,
            region.width as u32,
            region.height as u32,
        )
        .to_image();

        Ok(imageops::resize(
            &cropped,
            out_width,
            out_height,
            FilterType::Triangle,
        ))
    }
}

/// Single-channel 8-bit plane (row-major)
#[derive(Debug, Clone, PartialEq)]
pub struct GrayFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl GrayFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, CameraError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(CameraError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Luma plane of an RGB image
    pub fn from_image(image: &RgbImage) -> Self {
        let frame = VideoFrame {
            data: image.as_raw().clone(),
            width: image.width(),
            height: image.height(),
            timestamp_ms: 0,
            sequence: 0,
        };
        frame.to_grayscale()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixel at (x, y) with coordinates clamped to the plane (edge extension)
    pub fn get_clamped(&self, x: i64, y: i64) -> u8 {
        let cx = x.clamp(0, self.width as i64 - 1) as usize;
        let cy = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[cy * self.width as usize + cx]
    }
}
