// SPDX-License-Identifier: GPL-3.0-only

//! Photo library service
//!
//! Captured photos are written as new assets. The folder library stores
//! each asset as a timestamped file in a directory.

use super::camera::{BackendError, BackendResult, Photo};
use super::permission::AuthorizationStatus;
use crate::constants::library;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A photo that was written to the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    /// Id of the photo that was saved
    pub id: String,
    /// Where the asset lives
    pub path: PathBuf,
}

/// Photo library service
pub trait PhotoLibrary: Send + Sync {
    /// Current write authorization
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask for write access and return the resulting status
    fn request_authorization(&self) -> AuthorizationStatus;

    /// Write the photo's encoded bytes as a new asset
    fn save(&self, photo: &Photo) -> BackendResult<SavedAsset>;
}

/// Library backed by a directory on disk
#[derive(Debug, Clone)]
pub struct FolderLibrary {
    dir: PathBuf,
}

impl FolderLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a photo: `IMG_<date>_<time>_<id>.<ext>`
    pub fn file_name(photo: &Photo) -> String {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!(
            "{}_{}_{}.{}",
            library::FILE_PREFIX,
            timestamp,
            photo.short_id(),
            photo.extension
        )
    }
}

impl PhotoLibrary for FolderLibrary {
    fn authorization_status(&self) -> AuthorizationStatus {
        if self.dir.is_dir() {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::NotDetermined
        }
    }

    fn request_authorization(&self) -> AuthorizationStatus {
        match std::fs::create_dir_all(&self.dir) {
            Ok(()) => {
                info!(path = %self.dir.display(), "Photo directory ready");
                AuthorizationStatus::Authorized
            }
            Err(e) => {
                warn!(path = %self.dir.display(), error = %e, "Photo directory unavailable");
                AuthorizationStatus::Denied
            }
        }
    }

    fn save(&self, photo: &Photo) -> BackendResult<SavedAsset> {
        if !self.authorization_status().is_authorized() {
            return Err(BackendError::PermissionDenied(format!(
                "cannot write to {}",
                self.dir.display()
            )));
        }

        let path = self.dir.join(Self::file_name(photo));
        info!(path = %path.display(), "Saving photo");
        std::fs::write(&path, &photo.data)?;
        info!(path = %path.display(), "Photo saved successfully");

        Ok(SavedAsset {
            id: photo.id.clone(),
            path,
        })
    }
}
