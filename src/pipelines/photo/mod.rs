// SPDX-License-Identifier: MPL-2.0

//! Async photo capture pipeline
//!
//! ```text
//! Capture session → Still capture → Library authorization → Save
//!       ↓
//! Preview continues uninterrupted
//! ```

pub mod encoding;

pub use encoding::{EncodingFormat, PhotoEncoder};

use crate::backends::camera::{BackendError, BackendResult, CaptureSession};
use crate::backends::library::{PhotoLibrary, SavedAsset};
use std::sync::Arc;
use tracing::{info, warn};

/// Complete photo capture pipeline
///
/// Orchestrates the capture → authorize → save workflow.
#[derive(Clone)]
pub struct PhotoPipeline {
    session: CaptureSession,
    library: Arc<dyn PhotoLibrary>,
}

impl PhotoPipeline {
    pub fn new(session: CaptureSession, library: Arc<dyn PhotoLibrary>) -> Self {
        Self { session, library }
    }

    /// Capture a still and write it to the library.
    ///
    /// Blocks on device and disk I/O; use [`PhotoPipeline::run`] from async
    /// code.
    pub fn capture_and_save(&self) -> BackendResult<SavedAsset> {
        let photo = self.session.capture_still()?;
        info!(
            id = %photo.id,
            width = photo.width,
            height = photo.height,
            "Photo captured"
        );

        let status = self.library.request_authorization();
        if !status.is_authorized() {
            warn!(%status, "Photo library access not granted, discarding photo");
            return Err(BackendError::PermissionDenied(format!(
                "photo library access {}",
                status
            )));
        }

        self.library.save(&photo)
    }

    /// Run the pipeline on the blocking pool
    pub async fn run(self) -> BackendResult<SavedAsset> {
        tokio::task::spawn_blocking(move || self.capture_and_save())
            .await
            .map_err(|e| BackendError::Other(format!("Capture task error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{VirtualCaptureBackend, VirtualDeviceConfig};
    use crate::backends::library::FolderLibrary;

    fn streaming_session() -> CaptureSession {
        let session = CaptureSession::new(Box::new(VirtualCaptureBackend::new(
            VirtualDeviceConfig::default_devices(),
        )));
        session.configure_default().unwrap();
        session
    }

    #[tokio::test]
    async fn test_capture_lands_in_library() {
        let dir = std::env::temp_dir().join(format!("inspo-cam-pipeline-{}", uuid::Uuid::new_v4()));
        let pipeline = PhotoPipeline::new(streaming_session(), Arc::new(FolderLibrary::new(&dir)));

        let asset = pipeline.run().await.unwrap();
        assert!(asset.path.starts_with(&dir));
        assert_eq!(asset.path.extension().and_then(|e| e.to_str()), Some("jpg"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_idle_session_cannot_capture() {
        let session = CaptureSession::new(Box::new(VirtualCaptureBackend::new(
            VirtualDeviceConfig::default_devices(),
        )));
        let dir = std::env::temp_dir().join("inspo-cam-never-created");
        let pipeline = PhotoPipeline::new(session, Arc::new(FolderLibrary::new(&dir)));
        assert_eq!(pipeline.capture_and_save().unwrap_err(), BackendError::NotStreaming);
    }
}
