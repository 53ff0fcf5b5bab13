// SPDX-License-Identifier: GPL-3.0-only

//! Image orientation normalization
//!
//! Photos arrive with an orientation tag (a right-angle rotation plus an
//! optional horizontal mirror) describing how the stored pixels must be
//! turned before display. [`normalize`] applies such a tag and produces a
//! fresh, upright bitmap.
//!
//! The transform is the usual "translate to centre, flip, rotate, translate
//! back" matrix. Because every supported angle is a multiple of 90° it is
//! evaluated exactly by integer inverse mapping instead of resampling:
//!
//! ```text
//! destination = mirror_x( rotate_ccw(source, degrees) )
//! ```
//!
//! Rotations are counter-clockwise on screen, so a 90° tag moves the
//! top-left source pixel to the bottom-left of the output.

use super::bitmap::Bitmap;
use crate::errors::NormalizeError;
use std::sync::Arc;

/// Right-angle rotation, counter-clockwise as seen on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    None,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    /// All rotations in ascending order
    pub const ALL: [Rotation; 4] = [
        Rotation::None,
        Rotation::Rotate90,
        Rotation::Rotate180,
        Rotation::Rotate270,
    ];

    /// Create a rotation from degrees (normalised to 0-360).
    ///
    /// Anything that is not a right angle falls back to no rotation.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Rotation::Rotate90,
            180 => Rotation::Rotate180,
            270 => Rotation::Rotate270,
            _ => Rotation::None,
        }
    }

    /// Get the rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }

    /// Check if rotation swaps width and height
    pub fn swaps_dimensions(&self) -> bool {
        (self.degrees() / 90) % 2 == 1
    }

    /// Rotation that undoes this one
    pub fn inverse(&self) -> Self {
        Self::from_degrees(360 - self.degrees() as i32)
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Rotation plus horizontal mirror describing how to display a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrientationTag {
    pub rotation: Rotation,
    pub mirrored: bool,
}

impl OrientationTag {
    /// The identity tag: {0°, not mirrored}
    pub const IDENTITY: OrientationTag = OrientationTag {
        rotation: Rotation::None,
        mirrored: false,
    };

    pub fn new(rotation: Rotation, mirrored: bool) -> Self {
        Self { rotation, mirrored }
    }

    /// Horizontal flip only
    pub fn mirror() -> Self {
        Self::new(Rotation::None, true)
    }

    /// All eight tags
    pub fn all() -> impl Iterator<Item = OrientationTag> {
        Rotation::ALL
            .into_iter()
            .flat_map(|rotation| [false, true].map(|mirrored| Self::new(rotation, mirrored)))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Map an EXIF orientation code (1-8) to the tag that displays the image
    /// upright. Unknown codes are treated as identity.
    ///
    /// ```text
    /// 1 upright      2 flipped horizontally  3 upside down  4 flipped vertically
    /// 5 transposed   6 needs 90° clockwise   7 transversed  8 needs 90° counter-clockwise
    /// ```
    pub fn from_exif(code: u16) -> Self {
        match code {
            2 => Self::new(Rotation::None, true),
            3 => Self::new(Rotation::Rotate180, false),
            4 => Self::new(Rotation::Rotate180, true),
            5 => Self::new(Rotation::Rotate270, true),
            6 => Self::new(Rotation::Rotate270, false),
            7 => Self::new(Rotation::Rotate90, true),
            8 => Self::new(Rotation::Rotate90, false),
            _ => Self::IDENTITY,
        }
    }

    /// EXIF orientation code for this tag
    pub fn to_exif(&self) -> u16 {
        match (self.rotation, self.mirrored) {
            (Rotation::None, false) => 1,
            (Rotation::None, true) => 2,
            (Rotation::Rotate180, false) => 3,
            (Rotation::Rotate180, true) => 4,
            (Rotation::Rotate270, true) => 5,
            (Rotation::Rotate270, false) => 6,
            (Rotation::Rotate90, true) => 7,
            (Rotation::Rotate90, false) => 8,
        }
    }

    /// Output dimensions for a source of the given size
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if self.rotation.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Source coordinate that lands on destination pixel (`dx`, `dy`).
    ///
    /// `width`/`height` are the *source* dimensions.
    pub fn source_coordinate(&self, dx: u32, dy: u32, width: u32, height: u32) -> (u32, u32) {
        let (dst_w, _) = self.output_dimensions(width, height);
        // Undo the mirror first: it was applied last
        let rx = if self.mirrored { dst_w - 1 - dx } else { dx };
        let ry = dy;
        match self.rotation {
            Rotation::None => (rx, ry),
            Rotation::Rotate90 => (width - 1 - ry, rx),
            Rotation::Rotate180 => (width - 1 - rx, height - 1 - ry),
            Rotation::Rotate270 => (ry, height - 1 - rx),
        }
    }
}

impl From<image::metadata::Orientation> for OrientationTag {
    /// `image` names the correction to apply in clockwise terms
    fn from(orientation: image::metadata::Orientation) -> Self {
        use image::metadata::Orientation;
        match orientation {
            Orientation::NoTransforms => Self::IDENTITY,
            Orientation::Rotate90 => Self::new(Rotation::Rotate270, false),
            Orientation::Rotate180 => Self::new(Rotation::Rotate180, false),
            Orientation::Rotate270 => Self::new(Rotation::Rotate90, false),
            Orientation::FlipHorizontal => Self::new(Rotation::None, true),
            Orientation::FlipVertical => Self::new(Rotation::Rotate180, true),
            Orientation::Rotate90FlipH => Self::new(Rotation::Rotate270, true),
            Orientation::Rotate270FlipH => Self::new(Rotation::Rotate90, true),
        }
    }
}

impl std::fmt::Display for OrientationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.mirrored {
            write!(f, "{} mirrored", self.rotation)
        } else {
            write!(f, "{}", self.rotation)
        }
    }
}

/// Apply an orientation tag to a bitmap.
///
/// Returns a new, tightly packed bitmap with the same pixel layout and color
/// space. The source is never modified. An absent source yields
/// [`NormalizeError::MissingSource`].
pub fn normalize(source: Option<&Bitmap>, tag: OrientationTag) -> Result<Bitmap, NormalizeError> {
    let source = source.ok_or(NormalizeError::MissingSource)?;

    let (width, height) = source.dimensions();
    let (dst_w, dst_h) = tag.output_dimensions(width, height);
    let layout = source.layout();
    let bpp = layout.bytes_per_pixel();
    let dst_stride = dst_w as usize * bpp;

    let mut out = vec![0u8; dst_stride * dst_h as usize];
    for dy in 0..dst_h {
        let row = &mut out[dy as usize * dst_stride..(dy as usize + 1) * dst_stride];
        for (dx, px) in row.chunks_exact_mut(bpp).enumerate() {
            let (sx, sy) = tag.source_coordinate(dx as u32, dy, width, height);
            let src = source
                .pixel(sx, sy)
                .ok_or(NormalizeError::InvalidSource)?;
            px.copy_from_slice(src);
        }
    }

    let data: Arc<[u8]> = out.into();
    Bitmap::from_packed(dst_w, dst_h, layout, data)
        .map(|b| b.with_color_space(source.color_space()))
        .map_err(|_| NormalizeError::InvalidSource)
}

impl Bitmap {
    /// Convenience wrapper around [`normalize`]
    pub fn oriented(&self, tag: OrientationTag) -> Result<Bitmap, NormalizeError> {
        normalize(Some(self), tag)
    }
}
