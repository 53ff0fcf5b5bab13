// SPDX-License-Identifier: MPL-2.0

//! inspo-cam - Camera with an inspiration overlay
//!
//! Shows a semi-transparent reference photo over the live camera preview so
//! the shot can be lined up with the reference's pose and framing.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Application model, message handling and overlay compositing
//! - [`backends`]: Camera, photo library, picker and permission services
//! - [`media`]: Bitmaps, decoding and orientation normalization
//! - [`pipelines`]: Photo capture and encoding
//! - [`config`]: User configuration handling
//! - [`storage`]: Photo folder helpers
//! - [`terminal`]: Live viewer rendered in the terminal
//!
//! # Example
//!
//! ```
//! use inspo_cam::media::{Bitmap, OrientationTag, PixelLayout, Rotation, normalize};
//!
//! let source = Bitmap::from_packed(2, 1, PixelLayout::Gray8, vec![1, 2]).unwrap();
//! let rotated = normalize(Some(&source), OrientationTag::new(Rotation::Rotate90, false)).unwrap();
//! assert_eq!(rotated.dimensions(), (1, 2));
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod media;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, InspirationOverlay, Message, Operation, Services};
pub use config::Config;
pub use constants::QualityPreset;
