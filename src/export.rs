//! Handing a composed screenshot to the outside world: PNG files and the
//! system clipboard.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use bevy::log::info;
use chrono::{DateTime, Local};
use thiserror::Error;

use crate::annotate::ComposedImage;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Composed image is {len} bytes, too short for {width}x{height}")]
    MalformedImage { width: u32, height: u32, len: usize },

    #[error("Failed to write PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
}

fn rgba(image: &ComposedImage) -> Result<image::RgbaImage, ExportError> {
    image
        .to_rgba_image()
        .ok_or(ExportError::MalformedImage {
            width: image.width,
            height: image.height,
            len: image.pixels.len(),
        })
}

/// Suggested file name for a capture taken at `now`.
pub fn default_file_name(now: DateTime<Local>) -> String {
    format!("SnapMark_{}.png", now.format("%Y%m%d_%H%M%S"))
}

/// Encode `image` as PNG at `path`, adding a `.png` extension when the path
/// has none. Returns the path actually written.
pub fn save_png(image: &ComposedImage, path: &Path) -> Result<PathBuf, ExportError> {
    let mut path = path.to_path_buf();
    if path.extension().is_none() {
        path.set_extension("png");
    }
    rgba(image)?.save_with_format(&path, image::ImageFormat::Png)?;
    info!("Saved {}x{} image to {:?}", image.width, image.height, path);
    Ok(path)
}

/// Place `image` on the system clipboard as RGBA pixels.
pub fn copy_to_clipboard(image: &ComposedImage) -> Result<(), ExportError> {
    let pixels = rgba(image)?;
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_image(arboard::ImageData {
        width: image.width as usize,
        height: image.height as usize,
        bytes: Cow::Owned(pixels.into_raw()),
    })?;
    info!("Copied {}x{} image to clipboard", image.width, image.height);
    Ok(())
}
