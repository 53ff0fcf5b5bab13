// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers

use crate::app::operation::Operation;
use crate::app::state::{AppModel, Message};
use crate::backends::camera::BackendError;
use crate::backends::library::SavedAsset;
use crate::pipelines::photo::PhotoPipeline;
use tracing::{error, info};

impl AppModel {
    /// Capture a still and hand it to the photo library
    pub(crate) fn handle_capture(&mut self) -> Option<Operation<Message>> {
        if !self.camera.is_running() {
            info!("No camera running, nothing to capture");
            return None;
        }
        if self.is_capturing {
            info!("Capture already in progress");
            return None;
        }

        info!("Capturing photo...");
        self.is_capturing = true;
        let pipeline = PhotoPipeline::new(
            self.services.session.clone(),
            self.services.library.clone(),
        );
        Some(Operation::spawn(async move {
            Ok::<_, BackendError>(Message::PhotoSaved(pipeline.run().await))
        }))
    }

    pub(crate) fn handle_photo_saved(
        &mut self,
        result: Result<SavedAsset, BackendError>,
    ) -> Option<Operation<Message>> {
        self.is_capturing = false;
        match result {
            Ok(asset) => {
                info!(path = %asset.path.display(), "Photo saved");
                self.last_saved = Some(asset);
            }
            Err(e) => {
                error!(error = %e, "Failed to save photo");
                self.last_error = Some(e);
            }
        }
        None
    }
}
