//! Image files placed onto slides.

use crate::error::{Error, Result};
use crate::units::Emu;
use image::ImageFormat;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// An image loaded from disk, ready to be embedded in a package.
#[derive(Debug, Clone)]
pub struct Image {
    data: Vec<u8>,
    format: ImageFormat,
    width_px: u32,
    height_px: u32,
    filename: String,
}

impl Image {
    /// Load an image file, sniffing its format from the content.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(data, filename)
    }

    /// Build an image from in-memory bytes.
    pub fn from_bytes(data: Vec<u8>, filename: impl Into<String>) -> Result<Self> {
        let reader = image::ImageReader::new(Cursor::new(data.as_slice())).with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| Error::Image("unrecognized image format".to_string()))?;
        if extension(format).is_none() {
            return Err(Error::Image(format!("unsupported image format {:?}", format)));
        }
        let (width_px, height_px) = reader.into_dimensions()?;
        if width_px == 0 || height_px == 0 {
            return Err(Error::Image("image has zero size".to_string()));
        }

        Ok(Self {
            data,
            format,
            width_px,
            height_px,
            filename: filename.into(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Pixel dimensions as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// Part-name extension for this image.
    pub fn extension(&self) -> &'static str {
        extension(self.format).unwrap_or("png")
    }

    /// MIME content type for this image.
    pub fn content_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Jpeg => "image/jpeg",
            _ => "image/png",
        }
    }

    /// Height that keeps the aspect ratio when the image is drawn `width` wide.
    pub fn scaled_height(&self, width: Emu) -> Emu {
        let factor = width.0 as f64 / self.width_px as f64;
        Emu((self.height_px as f64 * factor).round() as i64)
    }
}

fn extension(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("png"),
        ImageFormat::Jpeg => Some("jpeg"),
        _ => None,
    }
}
