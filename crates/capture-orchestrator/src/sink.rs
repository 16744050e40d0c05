//! Persistence of captured images

use crate::SinkError;
use capture_throttle::SubjectKind;
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Storage capability for captured images
pub trait ImageSink: Send + Sync {
    /// Store `image` and return where it went
    fn persist(&self, kind: SubjectKind, index: u32, image: &RgbImage) -> Result<String, SinkError>;
}

/// Writes JPEG files named `<kind>-<index>.jpg` into a directory
#[derive(Debug, Clone)]
pub struct FileImageSink {
    directory: PathBuf,
}

impl FileImageSink {
    /// Create the sink, creating `directory` if needed
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        info!("Saving captured images to {}", directory.display());
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_path(&self, kind: SubjectKind, index: u32) -> PathBuf {
        self.directory.join(format!("{}-{:04}.jpg", kind, index))
    }
}

impl ImageSink for FileImageSink {
    fn persist(&self, kind: SubjectKind, index: u32, image: &RgbImage) -> Result<String, SinkError> {
        let path = self.file_path(kind, index);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        image.save_with_format(&path, ImageFormat::Jpeg)?;
        debug!("Saved {}x{} image to {}", image.width(), image.height(), path.display());
        Ok(path.display().to_string())
    }
}
