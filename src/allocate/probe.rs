//! Resolving image references to pixel dimensions.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Pixel dimensions of a resolved picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageInfo {
    /// Create image info from pixel dimensions.
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

/// Trait for resolving an image reference.
///
/// Implement this trait to read dimensions from somewhere other than the
/// local filesystem.
pub trait ImageProbe: Send + Sync {
    /// Resolve the picture at `path`, failing with [`Error::ImageResolve`]
    /// when it is missing, empty or undecodable.
    fn probe(&self, path: &Path) -> Result<ImageInfo>;
}

/// Probe that reads picture headers from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageProbe;

impl FsImageProbe {
    /// Create a new filesystem probe.
    pub fn new() -> Self {
        Self
    }
}

impl ImageProbe for FsImageProbe {
    fn probe(&self, path: &Path) -> Result<ImageInfo> {
        if path.as_os_str().is_empty() {
            return Err(Error::ImageResolve("empty image path".into()));
        }
        let meta = fs::metadata(path)
            .map_err(|e| Error::ImageResolve(format!("{}: {}", path.display(), e)))?;
        if !meta.is_file() {
            return Err(Error::ImageResolve(format!(
                "{}: not a regular file",
                path.display()
            )));
        }
        if meta.len() == 0 {
            return Err(Error::ImageResolve(format!(
                "{}: file is empty",
                path.display()
            )));
        }

        let (width, height) = image::image_dimensions(path)
            .map_err(|e| Error::ImageResolve(format!("{}: {}", path.display(), e)))?;
        if width == 0 || height == 0 {
            return Err(Error::ImageResolve(format!(
                "{}: zero-sized image",
                path.display()
            )));
        }
        Ok(ImageInfo::new(width, height))
    }
}
