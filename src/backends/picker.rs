// SPDX-License-Identifier: GPL-3.0-only

//! Photo picker service
//!
//! Presents a selection limited to images and hands back the chosen asset,
//! or reports that the user cancelled.

use super::camera::{BackendError, BackendResult};
use crate::constants::file_formats;
use crate::media::{Bitmap, load_image_file};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Kinds of assets the picker may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerFilter {
    #[default]
    Images,
}

impl PickerFilter {
    fn accepts(&self, path: &Path) -> bool {
        match self {
            PickerFilter::Images => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(file_formats::is_image_extension),
        }
    }
}

/// Picker presentation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerConfig {
    /// Most assets one pick may return
    pub selection_limit: usize,
    pub filter: PickerFilter,
    pub title: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            selection_limit: 1,
            filter: PickerFilter::Images,
            title: "Choose an inspiration photo".to_string(),
        }
    }
}

/// Handle to a chosen asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHandle {
    pub path: PathBuf,
}

impl AssetHandle {
    /// Decode the asset, rotated upright
    pub fn load(&self) -> BackendResult<Bitmap> {
        Ok(load_image_file(&self.path)?)
    }
}

/// Result of presenting the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// At least one and at most `selection_limit` assets
    Picked(Vec<AssetHandle>),
    Cancelled,
}

/// Photo picker service
pub trait PhotoPicker: Send + Sync {
    /// Present the picker and wait for the user's choice
    fn pick(&self, config: &PickerConfig) -> BackendResult<PickOutcome>;
}

fn check_pick(config: &PickerConfig, paths: Vec<PathBuf>) -> BackendResult<PickOutcome> {
    if paths.is_empty() {
        return Ok(PickOutcome::Cancelled);
    }
    if paths.len() > config.selection_limit {
        return Err(BackendError::Other(format!(
            "{} assets picked, at most {} allowed",
            paths.len(),
            config.selection_limit
        )));
    }
    if let Some(path) = paths.iter().find(|p| !config.filter.accepts(p)) {
        return Err(BackendError::Other(format!(
            "{} is not a supported image",
            path.display()
        )));
    }

    info!(count = paths.len(), first = %paths[0].display(), "Assets picked");
    Ok(PickOutcome::Picked(
        paths.into_iter().map(|path| AssetHandle { path }).collect(),
    ))
}

/// Picker answering from a queue of preset paths.
///
/// Each pick consumes one path; an empty queue behaves like the user
/// dismissing the picker.
#[derive(Debug, Default)]
pub struct PathPicker {
    queue: Mutex<VecDeque<PathBuf>>,
}

impl PathPicker {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            queue: Mutex::new(paths.into_iter().collect()),
        }
    }
}

impl PhotoPicker for PathPicker {
    fn pick(&self, config: &PickerConfig) -> BackendResult<PickOutcome> {
        let next = self
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(path) => check_pick(config, vec![path]),
            None => {
                debug!("Picker queue empty, treating as cancelled");
                Ok(PickOutcome::Cancelled)
            }
        }
    }
}

/// Native file dialog picker
#[derive(Debug, Clone, Default)]
pub struct DialogPicker {
    start_dir: Option<PathBuf>,
}

impl DialogPicker {
    pub fn new(start_dir: Option<PathBuf>) -> Self {
        Self { start_dir }
    }
}

impl PhotoPicker for DialogPicker {
    fn pick(&self, config: &PickerConfig) -> BackendResult<PickOutcome> {
        let mut dialog = rfd::FileDialog::new().set_title(config.title.as_str());
        if config.filter == PickerFilter::Images {
            dialog = dialog.add_filter("Images", file_formats::IMAGE_EXTENSIONS);
        }
        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }

        let picked = if config.selection_limit > 1 {
            dialog.pick_files().unwrap_or_default()
        } else {
            dialog.pick_file().into_iter().collect()
        };
        check_pick(config, picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_picks_one_image() {
        let config = PickerConfig::default();
        assert_eq!(config.selection_limit, 1);
        assert_eq!(config.filter, PickerFilter::Images);
    }

    #[test]
    fn test_path_picker_consumes_queue() {
        let picker = PathPicker::new([PathBuf::from("/photos/pose.jpg")]);
        let config = PickerConfig::default();

        assert_eq!(
            picker.pick(&config).unwrap(),
            PickOutcome::Picked(vec![AssetHandle {
                path: PathBuf::from("/photos/pose.jpg")
            }])
        );
        assert_eq!(picker.pick(&config).unwrap(), PickOutcome::Cancelled);
    }

    #[test]
    fn test_non_image_is_rejected() {
        let picker = PathPicker::new([PathBuf::from("/videos/clip.mp4")]);
        assert!(picker.pick(&PickerConfig::default()).is_err());
    }

    #[test]
    fn test_selection_limit_is_enforced() {
        let two = vec![PathBuf::from("/a.png"), PathBuf::from("/b.png")];
        assert!(check_pick(&PickerConfig::default(), two.clone()).is_err());

        let config = PickerConfig {
            selection_limit: 2,
            ..PickerConfig::default()
        };
        match check_pick(&config, two).unwrap() {
            PickOutcome::Picked(assets) => assert_eq!(assets.len(), 2),
            other => panic!("expected a pick, got {:?}", other),
        }

        assert_eq!(check_pick(&config, vec![]).unwrap(), PickOutcome::Cancelled);
    }

    #[test]
    fn test_missing_asset_fails_to_load() {
        let handle = AssetHandle {
            path: PathBuf::from("/nonexistent/pose.png"),
        };
        assert!(handle.load().is_err());
    }
}
