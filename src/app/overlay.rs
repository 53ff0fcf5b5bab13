// SPDX-License-Identifier: GPL-3.0-only

//! Inspiration overlay
//!
//! A semi-transparent reference image drawn over the live preview. The
//! image is fitted inside the preview keeping its aspect ratio (letterboxed
//! and centred) and blended at the chosen opacity.

use crate::constants::overlay::{DEFAULT_OPACITY, MAX_OPACITY, MIN_OPACITY};
use crate::errors::MediaResult;
use crate::media::{Bitmap, OrientationTag, normalize};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

/// Placement of the fitted overlay inside the preview frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest rectangle with the source's aspect ratio that fits inside the
/// destination, centred.
pub fn aspect_fit(src_width: u32, src_height: u32, dst_width: u32, dst_height: u32) -> FitRect {
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return FitRect {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
    }

    let scale = f64::min(
        dst_width as f64 / src_width as f64,
        dst_height as f64 / src_height as f64,
    );
    let width = ((src_width as f64 * scale).round() as u32).clamp(1, dst_width);
    let height = ((src_height as f64 * scale).round() as u32).clamp(1, dst_height);

    FitRect {
        x: (dst_width - width) / 2,
        y: (dst_height - height) / 2,
        width,
        height,
    }
}

/// `display` resized for one preview size
#[derive(Debug, Clone)]
struct FittedOverlay {
    preview: (u32, u32),
    rect: FitRect,
    image: RgbaImage,
}

/// Reference image with opacity and mirror state
#[derive(Debug, Clone)]
pub struct InspirationOverlay {
    image: Option<Bitmap>,
    /// `image` with the mirror applied, ready to draw
    display: Option<Bitmap>,
    /// Resize of `display` for the last preview size
    fitted: Option<FittedOverlay>,
    opacity: f32,
    mirrored: bool,
}

impl Default for InspirationOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl InspirationOverlay {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_OPACITY, false)
    }

    pub fn with_settings(opacity: f32, mirrored: bool) -> Self {
        let mut overlay = Self {
            image: None,
            display: None,
            fitted: None,
            opacity: DEFAULT_OPACITY,
            mirrored,
        };
        overlay.set_opacity(opacity);
        overlay
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Set the opacity, clamped to the slider range. NaN is ignored.
    pub fn set_opacity(&mut self, opacity: f32) {
        if opacity.is_nan() {
            warn!("Ignoring NaN overlay opacity");
            return;
        }
        self.opacity = opacity.clamp(MIN_OPACITY, MAX_OPACITY);
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn set_mirrored(&mut self, mirrored: bool) {
        if self.mirrored != mirrored {
            self.mirrored = mirrored;
            self.refresh_display();
        }
    }

    pub fn toggle_mirror(&mut self) {
        self.set_mirrored(!self.mirrored);
    }

    pub fn image(&self) -> Option<&Bitmap> {
        self.image.as_ref()
    }

    /// Replace the reference image; opacity and mirror state carry over
    pub fn set_image(&mut self, image: Bitmap) {
        debug!(width = image.width(), height = image.height(), "Setting inspiration image");
        self.image = Some(image);
        self.refresh_display();
    }

    fn refresh_display(&mut self) {
        self.fitted = None;
        self.display = match (&self.image, self.mirrored) {
            (None, _) => None,
            (Some(image), false) => Some(image.clone()),
            (Some(image), true) => match normalize(Some(image), OrientationTag::mirror()) {
                Ok(mirrored) => Some(mirrored),
                Err(e) => {
                    warn!(error = %e, "Could not mirror overlay, showing it unmirrored");
                    Some(image.clone())
                }
            },
        };
    }

    /// The overlay fitted to a preview size, resized only when the size changes
    fn fitted_for(&mut self, preview_width: u32, preview_height: u32) -> Option<&FittedOverlay> {
        let display = self.display.as_ref()?;
        let size = (preview_width, preview_height);

        if self.fitted.as_ref().is_none_or(|f| f.preview != size) {
            let rect = aspect_fit(display.width(), display.height(), preview_width, preview_height);
            debug!(width = rect.width, height = rect.height, "Fitting overlay to preview");
            let image = imageops::resize(
                &display.to_rgba_image(),
                rect.width,
                rect.height,
                FilterType::Triangle,
            );
            self.fitted = Some(FittedOverlay {
                preview: size,
                rect,
                image,
            });
        }
        self.fitted.as_ref()
    }

    /// Draw the overlay over a preview frame.
    ///
    /// The result is RGBA8 with the preview's dimensions.
    pub fn composite(&mut self, preview: &Bitmap) -> MediaResult<Bitmap> {
        let mut canvas = preview.to_rgba_image();
        let opacity = self.opacity;

        if opacity > 0.0
            && let Some(fitted) = self.fitted_for(canvas.width(), canvas.height())
        {
            blend_into(&mut canvas, &fitted.image, fitted.rect, opacity);
        }

        Bitmap::from_rgba_image(canvas)
    }
}

/// Source-over blend of `overlay` at `rect`, scaled by `opacity`
fn blend_into(canvas: &mut RgbaImage, overlay: &RgbaImage, rect: FitRect, opacity: f32) {
    for (ox, oy, src) in overlay.enumerate_pixels() {
        let (x, y) = (rect.x + ox, rect.y + oy);
        if x >= canvas.width() || y >= canvas.height() {
            continue;
        }

        let alpha = opacity * src[3] as f32 / 255.0;
        let dst = canvas.get_pixel_mut(x, y);
        let mix = |d: u8, s: u8| (d as f32 * (1.0 - alpha) + s as f32 * alpha).round() as u8;
        let out_alpha = (dst[3] as f32 + (255.0 - dst[3] as f32) * alpha).round() as u8;
        *dst = Rgba([mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), out_alpha]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::PixelLayout;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
        let data = rgba.repeat((width * height) as usize);
        Bitmap::from_packed(width, height, PixelLayout::Rgba8, data).unwrap()
    }

    #[test]
    fn test_aspect_fit_letterboxes() {
        // Wide image in a tall frame: full width, centred vertically
        assert_eq!(
            aspect_fit(200, 100, 100, 200),
            FitRect { x: 0, y: 75, width: 100, height: 50 }
        );
        // Tall image in a wide frame: full height, centred horizontally
        assert_eq!(
            aspect_fit(100, 200, 400, 100),
            FitRect { x: 175, y: 0, width: 50, height: 100 }
        );
        // Same aspect fills the frame
        assert_eq!(
            aspect_fit(640, 480, 320, 240),
            FitRect { x: 0, y: 0, width: 320, height: 240 }
        );
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut overlay = InspirationOverlay::new();
        assert_eq!(overlay.opacity(), DEFAULT_OPACITY);
        overlay.set_opacity(1.7);
        assert_eq!(overlay.opacity(), MAX_OPACITY);
        overlay.set_opacity(-0.2);
        assert_eq!(overlay.opacity(), MIN_OPACITY);
        overlay.set_opacity(f32::NAN);
        assert_eq!(overlay.opacity(), MIN_OPACITY);
    }

    #[test]
    fn test_no_image_returns_preview() {
        let preview = solid(4, 4, [10, 20, 30, 255]);
        let out = InspirationOverlay::new().composite(&preview).unwrap();
        assert_eq!(out.to_rgba_image(), preview.to_rgba_image());
    }

    #[test]
    fn test_blend_extremes() {
        let preview = solid(4, 4, [0, 0, 0, 255]);
        let mut overlay = InspirationOverlay::new();
        overlay.set_image(solid(2, 2, [200, 100, 50, 255]));

        overlay.set_opacity(0.0);
        assert_eq!(overlay.composite(&preview).unwrap().rgba_at(1, 1), [0, 0, 0, 255]);

        overlay.set_opacity(1.0);
        assert_eq!(overlay.composite(&preview).unwrap().rgba_at(1, 1), [200, 100, 50, 255]);
    }

    #[test]
    fn test_letterbox_area_is_untouched() {
        let preview = solid(4, 8, [0, 0, 0, 255]);
        let mut overlay = InspirationOverlay::with_settings(1.0, false);
        overlay.set_image(solid(4, 2, [255, 255, 255, 255]));

        let out = overlay.composite(&preview).unwrap();
        assert_eq!(out.dimensions(), (4, 8));
        assert_eq!(out.rgba_at(0, 0), [0, 0, 0, 255]);
        assert_eq!(out.rgba_at(0, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn test_mirror_survives_image_replacement() {
        let mut overlay = InspirationOverlay::with_settings(0.5, false);
        overlay.toggle_mirror();

        let data = vec![255, 0, 0, 255, 0, 0, 255, 255];
        overlay.set_image(Bitmap::from_packed(2, 1, PixelLayout::Rgba8, data).unwrap());

        assert!(overlay.is_mirrored());
        assert_eq!(overlay.opacity(), 0.5);
        // Source keeps its orientation, the drawn copy is flipped
        assert_eq!(overlay.image().unwrap().rgba_at(0, 0), [255, 0, 0, 255]);
        assert_eq!(overlay.display.as_ref().unwrap().rgba_at(0, 0), [0, 0, 255, 255]);
    }

    #[test]
    fn test_fitted_overlay_follows_preview_and_mirror() {
        let mut overlay = InspirationOverlay::with_settings(1.0, false);
        let data = vec![255, 0, 0, 255, 0, 0, 255, 255];
        overlay.set_image(Bitmap::from_packed(2, 1, PixelLayout::Rgba8, data).unwrap());

        let small = solid(2, 1, [0, 0, 0, 255]);
        assert_eq!(overlay.composite(&small).unwrap().rgba_at(0, 0), [255, 0, 0, 255]);
        assert_eq!(overlay.fitted.as_ref().unwrap().preview, (2, 1));

        overlay.composite(&solid(4, 2, [0, 0, 0, 255])).unwrap();
        assert_eq!(overlay.fitted.as_ref().unwrap().preview, (4, 2));

        // Mirroring drops the cached resize
        overlay.toggle_mirror();
        assert!(overlay.fitted.is_none());
        assert_eq!(overlay.composite(&small).unwrap().rgba_at(0, 0), [0, 0, 255, 255]);
    }
}
