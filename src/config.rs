// SPDX-License-Identifier: GPL-3.0-only

//! Persistent settings
//!
//! Stored as JSON in `<config dir>/inspo-cam/config.json`. A missing file
//! yields the defaults. A malformed one is reported and the app runs on the
//! defaults without writing over the file.

use crate::backends::camera::VirtualDeviceConfig;
use crate::backends::permission::AuthorizationStatus;
use crate::constants::{QualityPreset, library, overlay};
use crate::errors::{AppError, AppResult};
use crate::pipelines::photo::EncodingFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name inside the app's config directory
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial opacity of the inspiration overlay (0.0 - 1.0)
    pub overlay_opacity: f32,
    /// Start with the overlay mirrored
    pub mirror_overlay: bool,
    /// Where captured photos go; `None` uses the pictures folder
    pub photo_dir: Option<PathBuf>,
    /// Encoding of captured stills
    pub photo_format: EncodingFormat,
    /// JPEG quality preset
    pub photo_quality: QualityPreset,
    /// Camera authorization the app starts with
    pub camera_permission: AuthorizationStatus,
    /// Whether an undetermined permission is granted when requested
    pub grant_on_request: bool,
    /// Devices offered by the virtual capture backend
    pub virtual_devices: Vec<VirtualDeviceConfig>,
    /// Device to reopen on startup
    pub last_device_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlay_opacity: overlay::DEFAULT_OPACITY,
            mirror_overlay: false,
            photo_dir: None,
            photo_format: EncodingFormat::default(),
            photo_quality: QualityPreset::default(),
            camera_permission: AuthorizationStatus::NotDetermined,
            grant_on_request: true,
            virtual_devices: VirtualDeviceConfig::default_devices(),
            last_device_id: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(library::ALBUM_NAME).join(CONFIG_FILE))
    }

    /// Load settings from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::Config(format!("{}: {}", path.display(), e))),
        };

        let config = serde_json::from_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Settings for a run, plus the path they may be saved back to.
    ///
    /// When the file exists but cannot be loaded the defaults are used and no
    /// save path is returned, so the user's file is left alone.
    pub fn open(path: Option<PathBuf>) -> (Self, Option<PathBuf>) {
        let Some(path) = path else {
            return (Self::default(), None);
        };
        match Self::load(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                warn!(error = %e, "Unreadable config, using defaults and not saving");
                (Self::default(), None)
            }
        }
    }

    /// Write settings to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("{}: {}", parent.display(), e)))?;
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Directory photos are saved to
    pub fn photo_directory(&self) -> PathBuf {
        self.photo_dir
            .clone()
            .unwrap_or_else(crate::storage::default_photo_directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "mirror_overlay": true }"#).unwrap();
        assert!(config.mirror_overlay);
        assert_eq!(config.overlay_opacity, overlay::DEFAULT_OPACITY);
        assert_eq!(config.virtual_devices.len(), 2);
    }

    #[test]
    fn test_permission_is_kebab_case() {
        let config: Config =
            serde_json::from_str(r#"{ "camera_permission": "not-determined" }"#).unwrap();
        assert_eq!(config.camera_permission, AuthorizationStatus::NotDetermined);
        let config: Config = serde_json::from_str(r#"{ "camera_permission": "denied" }"#).unwrap();
        assert_eq!(config.camera_permission, AuthorizationStatus::Denied);
    }
}
