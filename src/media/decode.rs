// SPDX-License-Identifier: GPL-3.0-only

//! Decoding encoded photos into bitmaps
//!
//! Picked reference images and captured stills are stored encoded (JPEG,
//! PNG, ...). Camera JPEGs usually keep the sensor's native orientation and
//! record the display orientation in EXIF, so decoding also reports the
//! orientation tag needed to show the picture upright.

use super::bitmap::Bitmap;
use super::orientation::OrientationTag;
use crate::constants::file_formats;
use crate::errors::{MediaError, MediaResult};
use image::{ImageDecoder, ImageReader};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// A decoded image and the orientation recorded in its metadata
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub bitmap: Bitmap,
    pub orientation: OrientationTag,
}

impl DecodedImage {
    /// Apply the recorded orientation
    pub fn upright(&self) -> MediaResult<Bitmap> {
        if self.orientation.is_identity() {
            return Ok(self.bitmap.clone());
        }
        Ok(self.bitmap.oriented(self.orientation)?)
    }
}

/// Decode encoded image bytes, keeping the stored pixel orientation
pub fn decode_image(bytes: &[u8]) -> MediaResult<DecodedImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| MediaError::DecodeFailed(format!("Failed to read image header: {}", e)))?;

    let format = reader.format();
    let mut decoder = reader.into_decoder()?;

    // Missing or unreadable EXIF is not an error, the picture is shown as stored
    let orientation = decoder
        .orientation()
        .map(OrientationTag::from)
        .unwrap_or_default();

    let image = image::DynamicImage::from_decoder(decoder)?;
    debug!(
        ?format,
        width = image.width(),
        height = image.height(),
        %orientation,
        "Decoded image"
    );

    Ok(DecodedImage {
        bitmap: Bitmap::from_dynamic(image)?,
        orientation,
    })
}

/// Decode encoded image bytes and rotate them upright
pub fn decode_upright(bytes: &[u8]) -> MediaResult<Bitmap> {
    decode_image(bytes)?.upright()
}

/// Load an image file and rotate it upright
pub fn load_image_file(path: &Path) -> MediaResult<Bitmap> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !file_formats::is_image_extension(&extension) {
        return Err(MediaError::DecodeFailed(format!(
            "Unsupported file format: {}",
            extension
        )));
    }

    info!(path = %path.display(), "Loading image file");
    let bytes = std::fs::read(path).map_err(|e| {
        MediaError::DecodeFailed(format!("Failed to read '{}': {}", path.display(), e))
    })?;
    decode_upright(&bytes)
}
