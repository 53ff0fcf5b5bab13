// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Photo quality presets
///
/// Maps to a JPEG quality value when captured stills are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityPreset {
    /// Smaller files, visible compression artifacts
    Low,
    /// Balanced quality and file size
    Medium,
    /// Near-lossless (default)
    #[default]
    High,
    /// Minimal compression
    Maximum,
}

impl QualityPreset {
    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
            QualityPreset::Maximum => "Maximum",
        }
    }

    /// Get JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 80,
            QualityPreset::High => 92,
            QualityPreset::Maximum => 98,
        }
    }
}

/// Inspiration overlay constants
pub mod overlay {
    /// Initial overlay opacity
    pub const DEFAULT_OPACITY: f32 = 0.35;

    /// Lowest slider value (overlay hidden)
    pub const MIN_OPACITY: f32 = 0.0;

    /// Highest slider value (overlay fully opaque)
    pub const MAX_OPACITY: f32 = 1.0;

    /// Opacity change per key press in the terminal viewer
    pub const OPACITY_STEP: f32 = 0.05;
}

/// Photo library naming
pub mod library {
    /// Folder created under the user's pictures directory
    pub const ALBUM_NAME: &str = "inspo-cam";

    /// File name prefix for saved photos
    pub const FILE_PREFIX: &str = "IMG";
}

/// Supported file formats for reference images and virtual devices
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Virtual capture device constants
pub mod virtual_camera {
    /// Size of the generated test pattern when no source image is configured
    pub const PATTERN_WIDTH: u32 = 640;
    pub const PATTERN_HEIGHT: u32 = 480;
}

/// Terminal viewer timing
pub mod timing {
    use super::Duration;

    /// Input poll timeout, also bounds the redraw rate
    pub const INPUT_POLL: Duration = Duration::from_millis(16);

    /// How long to wait for the first frame when capturing from the CLI
    pub const WARMUP: Duration = Duration::from_millis(500);
}

/// Resolution labels for device listings
pub fn get_resolution_label(width: u32) -> Option<&'static str> {
    match width {
        w if w >= 7680 => Some("8K"), // 7680x4320
        w if w >= 3840 => Some("4K"), // 3840x2160
        w if w >= 2560 => Some("2K"), // 2560x1440
        w if w >= 1920 => Some("HD"), // 1920x1080
        w if w >= 640 => Some("SD"),  // 640x480
        _ => None,
    }
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_labels() {
        assert_eq!(get_resolution_label(3840), Some("4K"));
        assert_eq!(get_resolution_label(1920), Some("HD"));
        assert_eq!(get_resolution_label(640), Some("SD"));
        assert_eq!(get_resolution_label(320), None);
    }

    #[test]
    fn test_default_opacity_in_range() {
        assert!(overlay::DEFAULT_OPACITY >= overlay::MIN_OPACITY);
        assert!(overlay::DEFAULT_OPACITY <= overlay::MAX_OPACITY);
    }

    #[test]
    fn test_image_extensions_case_insensitive() {
        assert!(file_formats::is_image_extension("JPG"));
        assert!(!file_formats::is_image_extension("mp4"));
    }
}
