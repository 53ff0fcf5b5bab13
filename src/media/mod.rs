// SPDX-License-Identifier: MPL-2.0

//! Bitmap handling for previews, captures and reference images
//!
//! # Modules
//!
//! - [`bitmap`]: the immutable [`Bitmap`] buffer and its pixel layouts
//! - [`orientation`]: orientation tags and the [`normalize`] transform
//! - [`decode`]: decoding encoded photos, honouring EXIF orientation

pub mod bitmap;
pub mod decode;
pub mod orientation;

// Re-export commonly used types
pub use bitmap::{Bitmap, ColorSpace, PixelLayout};
pub use decode::{DecodedImage, decode_image, decode_upright, load_image_file};
pub use orientation::{OrientationTag, Rotation, normalize};
