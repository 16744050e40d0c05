//! Capture options record and its validated setters

use crate::{Color, ConfigError, Roi};
use camera_capture::CameraLens;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Camera image capture type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureType {
    #[default]
    None,
    Face,
    #[serde(rename = "qrcode")]
    QrCode,
    Frame,
}

impl FromStr for CaptureType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(CaptureType::None),
            "face" => Ok(CaptureType::Face),
            "qrcode" => Ok(CaptureType::QrCode),
            "frame" => Ok(CaptureType::Frame),
            other => Err(ConfigError::InvalidCaptureType(other.to_string())),
        }
    }
}

impl fmt::Display for CaptureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureType::None => "none",
            CaptureType::Face => "face",
            CaptureType::QrCode => "qrcode",
            CaptureType::Frame => "frame",
        };
        f.write_str(name)
    }
}

/// Capture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Active analyzer
    pub capture_type: CaptureType,

    /// Camera lens facing
    pub camera_lens: CameraLens,

    /// Images to capture before ending; 0 captures unlimited
    pub number_of_images: u32,

    /// Minimum interval between saved images (milliseconds)
    pub time_between_images_ms: u64,

    /// Saved image size (pixels)
    pub image_output_width: u32,
    pub image_output_height: u32,

    /// Persist captured images
    pub save_image_captured: bool,

    /// Draw the detection box overlay
    pub detection_box: bool,
    pub detection_box_color: Color,

    /// Draw the face contour overlay
    pub face_contours: bool,
    pub face_contours_color: Color,

    /// Enlarge the face crop by this fraction of the box size
    pub face_padding_percent: f64,

    /// Subject width relative to the view width (or ROI width), in [0, 1].
    /// `minimum_size <= maximum_size` is the caller's responsibility.
    pub minimum_size: f64,
    pub maximum_size: f64,

    /// Region of interest
    pub roi: Roi,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            capture_type: CaptureType::None,
            camera_lens: CameraLens::Front,
            number_of_images: 0,
            time_between_images_ms: 1000,
            image_output_width: 200,
            image_output_height: 200,
            save_image_captured: false,
            detection_box: true,
            detection_box_color: Color::WHITE,
            face_contours: false,
            face_contours_color: Color::new(204, 255, 255, 255),
            face_padding_percent: 0.27,
            minimum_size: 0.0,
            maximum_size: 1.0,
            roi: Roi::default(),
        }
    }
}

fn check_fraction(value: f64, err: fn(f64) -> ConfigError) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(err(value))
    }
}

impl CaptureOptions {
    /// Load options from an optional TOML file layered under `CAPTURE_*`
    /// environment variables (nested keys use `__`, e.g. `CAPTURE_ROI__ENABLE`).
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// [`load`](Self::load) reading variables from `env` instead of the
    /// process environment when given
    pub fn load_with_env(
        path: Option<&str>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            info!("Loading capture options from {}", path);
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix("CAPTURE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let options: CaptureOptions = settings.try_deserialize()?;
        options.validate()?;
        debug!("Capture options loaded: {:?}", options);
        Ok(options)
    }

    /// Range-check every field of an already-built record
    pub fn validate(&self) -> Result<(), ConfigError> {
        if i64::try_from(self.time_between_images_ms).is_err() {
            return Err(ConfigError::InvalidTimeBetweenImages(
                self.time_between_images_ms.into(),
            ));
        }
        if self.image_output_width == 0 {
            return Err(ConfigError::InvalidOutputImageWidth(0));
        }
        if self.image_output_height == 0 {
            return Err(ConfigError::InvalidOutputImageHeight(0));
        }
        if self.face_padding_percent.is_nan() || self.face_padding_percent < 0.0 {
            return Err(ConfigError::InvalidFacePaddingPercent(
                self.face_padding_percent,
            ));
        }
        check_fraction(self.minimum_size, ConfigError::InvalidMinimumSize)?;
        check_fraction(self.maximum_size, ConfigError::InvalidMaximumSize)?;
        check_fraction(self.roi.top_offset, ConfigError::InvalidRoiTopOffset)?;
        check_fraction(self.roi.right_offset, ConfigError::InvalidRoiRightOffset)?;
        check_fraction(self.roi.bottom_offset, ConfigError::InvalidRoiBottomOffset)?;
        check_fraction(self.roi.left_offset, ConfigError::InvalidRoiLeftOffset)?;
        Ok(())
    }

    pub fn set_capture_type(&mut self, value: &str) -> Result<(), ConfigError> {
        self.capture_type = value.parse()?;
        Ok(())
    }

    pub fn set_camera_lens(&mut self, value: &str) -> Result<(), ConfigError> {
        self.camera_lens = value
            .parse()
            .map_err(|_| ConfigError::InvalidCameraLens(value.to_string()))?;
        Ok(())
    }

    pub fn set_number_of_images(&mut self, value: i64) -> Result<(), ConfigError> {
        self.number_of_images =
            u32::try_from(value).map_err(|_| ConfigError::InvalidNumberOfImages(value))?;
        Ok(())
    }

    pub fn set_time_between_images(&mut self, value_ms: i64) -> Result<(), ConfigError> {
        self.time_between_images_ms = u64::try_from(value_ms)
            .map_err(|_| ConfigError::InvalidTimeBetweenImages(value_ms.into()))?;
        Ok(())
    }

    pub fn set_output_image_width(&mut self, value: i64) -> Result<(), ConfigError> {
        match u32::try_from(value) {
            Ok(width) if width > 0 => {
                self.image_output_width = width;
                Ok(())
            }
            _ => Err(ConfigError::InvalidOutputImageWidth(value)),
        }
    }

    pub fn set_output_image_height(&mut self, value: i64) -> Result<(), ConfigError> {
        match u32::try_from(value) {
            Ok(height) if height > 0 => {
                self.image_output_height = height;
                Ok(())
            }
            _ => Err(ConfigError::InvalidOutputImageHeight(value)),
        }
    }

    pub fn set_save_image_captured(&mut self, enable: bool) {
        self.save_image_captured = enable;
    }

    pub fn set_detection_box(&mut self, enable: bool) {
        self.detection_box = enable;
    }

    pub fn set_detection_box_color(
        &mut self,
        alpha: i64,
        red: i64,
        green: i64,
        blue: i64,
    ) -> Result<(), ConfigError> {
        self.detection_box_color = Color::from_argb(alpha, red, green, blue)
            .ok_or(ConfigError::InvalidDetectionBoxColor)?;
        Ok(())
    }

    pub fn set_face_contours(&mut self, enable: bool) {
        self.face_contours = enable;
    }

    pub fn set_face_contours_color(
        &mut self,
        alpha: i64,
        red: i64,
        green: i64,
        blue: i64,
    ) -> Result<(), ConfigError> {
        self.face_contours_color = Color::from_argb(alpha, red, green, blue)
            .ok_or(ConfigError::InvalidFaceContoursColor)?;
        Ok(())
    }

    pub fn set_face_padding_percent(&mut self, value: f64) -> Result<(), ConfigError> {
        if value.is_nan() || value < 0.0 {
            return Err(ConfigError::InvalidFacePaddingPercent(value));
        }
        self.face_padding_percent = value;
        Ok(())
    }

    pub fn set_minimum_size(&mut self, value: f64) -> Result<(), ConfigError> {
        self.minimum_size = check_fraction(value, ConfigError::InvalidMinimumSize)?;
        Ok(())
    }

    pub fn set_maximum_size(&mut self, value: f64) -> Result<(), ConfigError> {
        self.maximum_size = check_fraction(value, ConfigError::InvalidMaximumSize)?;
        Ok(())
    }

    pub fn set_roi_enable(&mut self, enable: bool) {
        self.roi.enable = enable;
    }

    pub fn set_roi_top_offset(&mut self, value: f64) -> Result<(), ConfigError> {
        self.roi.top_offset = check_fraction(value, ConfigError::InvalidRoiTopOffset)?;
        Ok(())
    }

    pub fn set_roi_right_offset(&mut self, value: f64) -> Result<(), ConfigError> {
        self.roi.right_offset = check_fraction(value, ConfigError::InvalidRoiRightOffset)?;
        Ok(())
    }

    pub fn set_roi_bottom_offset(&mut self, value: f64) -> Result<(), ConfigError> {
        self.roi.bottom_offset = check_fraction(value, ConfigError::InvalidRoiBottomOffset)?;
        Ok(())
    }

    pub fn set_roi_left_offset(&mut self, value: f64) -> Result<(), ConfigError> {
        self.roi.left_offset = check_fraction(value, ConfigError::InvalidRoiLeftOffset)?;
        Ok(())
    }

    pub fn set_roi_area_offset(&mut self, enable: bool) {
        self.roi.area_offset_enable = enable;
    }

    pub fn set_roi_area_offset_color(
        &mut self,
        alpha: i64,
        red: i64,
        green: i64,
        blue: i64,
    ) -> Result<(), ConfigError> {
        self.roi.area_offset_color =
            Color::from_argb(alpha, red, green, blue).ok_or(ConfigError::InvalidRoiColor)?;
        Ok(())
    }
}
