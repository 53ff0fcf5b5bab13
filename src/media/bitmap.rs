// SPDX-License-Identifier: GPL-3.0-only

//! Immutable bitmap buffers
//!
//! A [`Bitmap`] is a dimensioned grid of 8-bit samples together with the
//! metadata needed to address it (stride, channel packing, color space).
//! Pixel data is reference counted so bitmaps are cheap to clone and share
//! between the preview, the overlay and background tasks, but it is never
//! mutated after construction.

use crate::errors::{MediaError, MediaResult};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use std::sync::Arc;

/// Channel packing of a bitmap's pixels (8 bits per component)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// R G B A
    Rgba8,
    /// B G R A, common on capture hardware
    Bgra8,
    /// R G B without alpha
    Rgb8,
    /// Single luma channel
    Gray8,
}

impl PixelLayout {
    /// Bytes occupied by one pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgba8 | Self::Bgra8 => 4,
            Self::Rgb8 => 3,
            Self::Gray8 => 1,
        }
    }
}

impl std::fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgba8 => write!(f, "RGBA8"),
            Self::Bgra8 => write!(f, "BGRA8"),
            Self::Rgb8 => write!(f, "RGB8"),
            Self::Gray8 => write!(f, "GRAY8"),
        }
    }
}

/// Color space tag carried alongside pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    #[default]
    Srgb,
    Gray,
}

/// An immutable grid of pixel samples
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    /// Bytes per row, may include padding
    stride: u32,
    layout: PixelLayout,
    color_space: ColorSpace,
    data: Arc<[u8]>,
}

impl Bitmap {
    /// Wrap raw pixel data, validating it against the declared geometry.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: u32,
        layout: PixelLayout,
        data: impl Into<Arc<[u8]>>,
    ) -> MediaResult<Self> {
        let data = data.into();
        let bpp = layout.bytes_per_pixel();

        if width == 0 || height == 0 {
            return Err(MediaError::InvalidBitmap(format!(
                "zero-sized bitmap {}x{}",
                width, height
            )));
        }

        let row_bytes = width as usize * bpp;
        if (stride as usize) < row_bytes {
            return Err(MediaError::InvalidBitmap(format!(
                "stride {} is smaller than a row of {} bytes",
                stride, row_bytes
            )));
        }

        // The last row does not need trailing padding
        let required = stride as usize * (height as usize - 1) + row_bytes;
        if data.len() < required {
            return Err(MediaError::InvalidBitmap(format!(
                "data too small: expected {}, got {}",
                required,
                data.len()
            )));
        }

        let color_space = if layout == PixelLayout::Gray8 {
            ColorSpace::Gray
        } else {
            ColorSpace::Srgb
        };

        Ok(Self {
            width,
            height,
            stride,
            layout,
            color_space,
            data,
        })
    }

    /// Wrap tightly packed pixel data (stride = width * bytes per pixel)
    pub fn from_packed(
        width: u32,
        height: u32,
        layout: PixelLayout,
        data: impl Into<Arc<[u8]>>,
    ) -> MediaResult<Self> {
        let stride = u32::try_from(layout.bytes_per_pixel())
            .ok()
            .and_then(|bpp| width.checked_mul(bpp))
            .ok_or_else(|| {
                MediaError::InvalidBitmap(format!("row of {} {} pixels is too wide", width, layout))
            })?;
        Self::from_raw(width, height, stride, layout, data)
    }

    /// Replace the color space tag
    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Raw sample bytes including any row padding
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of one pixel, or `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.layout.bytes_per_pixel();
        let start = y as usize * self.stride as usize + x as usize * bpp;
        self.data.get(start..start + bpp)
    }

    /// Pixel as RGBA regardless of layout (out of bounds reads are transparent)
    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        match (self.layout, self.pixel(x, y)) {
            (PixelLayout::Rgba8, Some(p)) => [p[0], p[1], p[2], p[3]],
            (PixelLayout::Bgra8, Some(p)) => [p[2], p[1], p[0], p[3]],
            (PixelLayout::Rgb8, Some(p)) => [p[0], p[1], p[2], 255],
            (PixelLayout::Gray8, Some(p)) => [p[0], p[0], p[0], 255],
            (_, None) => [0, 0, 0, 0],
        }
    }

    /// Convert to an RGBA image (always copies)
    pub fn to_rgba_image(&self) -> RgbaImage {
        if self.layout == PixelLayout::Rgba8 && self.is_packed() {
            let len = self.width as usize * self.height as usize * 4;
            if let Some(img) = RgbaImage::from_raw(self.width, self.height, self.data[..len].to_vec())
            {
                return img;
            }
        }
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.rgba_at(x, y))
        })
    }

    /// Build a bitmap from any decoded image.
    ///
    /// RGB and luma images keep their packing, everything else becomes RGBA8.
    pub fn from_dynamic(image: DynamicImage) -> MediaResult<Self> {
        match image {
            DynamicImage::ImageRgb8(img) => Self::from_rgb_image(img),
            DynamicImage::ImageLuma8(img) => Self::from_gray_image(img),
            other => Self::from_rgba_image(other.to_rgba8()),
        }
    }

    pub fn from_rgba_image(image: RgbaImage) -> MediaResult<Self> {
        let (width, height) = image.dimensions();
        Self::from_packed(width, height, PixelLayout::Rgba8, image.into_raw())
    }

    pub fn from_rgb_image(image: RgbImage) -> MediaResult<Self> {
        let (width, height) = image.dimensions();
        Self::from_packed(width, height, PixelLayout::Rgb8, image.into_raw())
    }

    pub fn from_gray_image(image: GrayImage) -> MediaResult<Self> {
        let (width, height) = image.dimensions();
        Self::from_packed(width, height, PixelLayout::Gray8, image.into_raw())
    }

    /// Convert to a `DynamicImage` for encoding
    pub fn to_dynamic(&self) -> DynamicImage {
        match self.layout {
            PixelLayout::Rgb8 => DynamicImage::ImageRgb8(RgbImage::from_fn(
                self.width,
                self.height,
                |x, y| {
                    let [r, g, b, _] = self.rgba_at(x, y);
                    image::Rgb([r, g, b])
                },
            )),
            PixelLayout::Gray8 => DynamicImage::ImageLuma8(GrayImage::from_fn(
                self.width,
                self.height,
                |x, y| image::Luma([self.rgba_at(x, y)[0]]),
            )),
            PixelLayout::Rgba8 | PixelLayout::Bgra8 => {
                DynamicImage::ImageRgba8(self.to_rgba_image())
            }
        }
    }

    fn is_packed(&self) -> bool {
        self.stride as usize == self.width as usize * self.layout.bytes_per_pixel()
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("layout", &self.layout)
            .field("color_space", &self.color_space)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_data() {
        let result = Bitmap::from_packed(4, 4, PixelLayout::Rgba8, vec![0u8; 63]);
        assert!(matches!(result, Err(MediaError::InvalidBitmap(_))));
    }

    #[test]
    fn test_rejects_overflowing_width() {
        let result = Bitmap::from_packed(u32::MAX, 1, PixelLayout::Rgba8, vec![0u8; 4]);
        assert!(matches!(result, Err(MediaError::InvalidBitmap(_))));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(Bitmap::from_packed(0, 4, PixelLayout::Gray8, vec![0u8; 4]).is_err());
    }

    #[test]
    fn test_last_row_needs_no_padding() {
        // 2x2 RGB with 8-byte stride: 8 + 6 bytes is enough
        let bitmap = Bitmap::from_raw(2, 2, 8, PixelLayout::Rgb8, vec![1u8; 14]).unwrap();
        assert_eq!(bitmap.pixel(1, 1), Some(&[1u8, 1, 1][..]));
    }

    #[test]
    fn test_bgra_reads_as_rgba() {
        let bitmap = Bitmap::from_packed(1, 1, PixelLayout::Bgra8, vec![10, 20, 30, 40]).unwrap();
        assert_eq!(bitmap.rgba_at(0, 0), [30, 20, 10, 40]);
    }

    #[test]
    fn test_padded_rgba_converts_without_padding() {
        let mut data = vec![0u8; 12 + 8];
        data[..4].copy_from_slice(&[1, 2, 3, 4]);
        data[12..16].copy_from_slice(&[5, 6, 7, 8]);
        let bitmap = Bitmap::from_raw(2, 2, 12, PixelLayout::Rgba8, data).unwrap();
        let image = bitmap.to_rgba_image();
        assert_eq!(image.get_pixel(0, 0).0, [1, 2, 3, 4]);
        assert_eq!(image.get_pixel(0, 1).0, [5, 6, 7, 8]);
    }

    #[test]
    fn test_gray_bitmap_tags_gray_color_space() {
        let bitmap = Bitmap::from_packed(2, 1, PixelLayout::Gray8, vec![0u8, 255]).unwrap();
        assert_eq!(bitmap.color_space(), ColorSpace::Gray);
        assert_eq!(bitmap.rgba_at(1, 0), [255, 255, 255, 255]);
    }
}
