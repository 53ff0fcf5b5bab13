// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding
//!
//! This module handles encoding bitmaps to various formats:
//! - JPEG (with quality control)
//! - PNG (lossless)

use crate::constants::QualityPreset;
use crate::media::Bitmap;
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Supported encoding formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncodingFormat {
    /// JPEG format (lossy compression)
    #[default]
    Jpeg,
    /// PNG format (lossless compression)
    Png,
}

impl EncodingFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            EncodingFormat::Jpeg => "jpg",
            EncodingFormat::Png => "png",
        }
    }

    /// Guess the format from an output path's extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(EncodingFormat::Jpeg),
            "png" => Some(EncodingFormat::Png),
            _ => None,
        }
    }
}

/// Photo encoder
#[derive(Debug, Clone)]
pub struct PhotoEncoder {
    format: EncodingFormat,
    quality: QualityPreset,
}

impl PhotoEncoder {
    /// Create a new encoder with JPEG format and high quality
    pub fn new() -> Self {
        Self {
            format: EncodingFormat::Jpeg,
            quality: QualityPreset::High,
        }
    }

    /// Set encoding format
    pub fn set_format(&mut self, format: EncodingFormat) {
        self.format = format;
    }

    /// Set encoding quality (only affects JPEG)
    pub fn set_quality(&mut self, quality: QualityPreset) {
        self.quality = quality;
    }

    pub fn format(&self) -> EncodingFormat {
        self.format
    }

    /// Encode a bitmap synchronously
    pub fn encode_bitmap(&self, bitmap: &Bitmap) -> Result<Vec<u8>, String> {
        let data = match self.format {
            EncodingFormat::Jpeg => {
                Self::encode_jpeg(bitmap.to_dynamic().to_rgb8(), self.quality)?
            }
            EncodingFormat::Png => Self::encode_png(bitmap)?,
        };
        debug!(size = data.len(), format = ?self.format, "Encoding complete");
        Ok(data)
    }

    /// Encode image as JPEG
    fn encode_jpeg(image: RgbImage, quality: QualityPreset) -> Result<Vec<u8>, String> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        // Create JPEG encoder with quality setting
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.jpeg_quality());

        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| format!("JPEG encoding failed: {}", e))?;

        Ok(buffer)
    }

    /// Encode image as PNG, keeping alpha when present
    fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, String> {
        let mut buffer = Vec::new();

        bitmap
            .to_dynamic()
            .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| format!("PNG encoding failed: {}", e))?;

        Ok(buffer)
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new()
    }
}
