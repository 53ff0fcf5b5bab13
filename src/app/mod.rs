// SPDX-License-Identifier: MPL-2.0

//! Main application module
//!
//! This module contains the application state, message handling and the
//! inspiration overlay.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, CameraState)
//! - `handlers`: Message handlers grouped by domain
//! - `update`: Message dispatch
//! - `overlay`: Reference image compositing
//! - `operation`: Background work handles
//!
//! # Main Types
//!
//! - `AppModel`: Main application state owning the capture session and services
//! - `Message`: All possible user interactions and system events
//! - `Operation`: Result of work that runs off the UI thread

mod handlers;
pub mod operation;
pub mod overlay;
mod state;
mod update;

pub use operation::{Operation, OperationStatus};
pub use overlay::{FitRect, InspirationOverlay, aspect_fit};
pub use state::{AppModel, CameraState, Message, Services};

use crate::backends::camera::{CaptureSession, VirtualCaptureBackend};
use crate::backends::library::FolderLibrary;
use crate::backends::permission::ConfiguredPermissions;
use crate::backends::picker::{PhotoPicker, PickerConfig};
use crate::config::Config;
use crate::media::Bitmap;
use std::sync::Arc;
use tracing::{debug, info};

impl Services {
    /// Services backed by the configured virtual devices, the photo folder
    /// and the configured permission state
    pub fn from_config(config: &Config, picker: Arc<dyn PhotoPicker>) -> Self {
        let backend = VirtualCaptureBackend::new(config.virtual_devices.clone())
            .with_output(config.photo_format, config.photo_quality);

        Self {
            session: CaptureSession::new(Box::new(backend)),
            library: Arc::new(FolderLibrary::new(config.photo_directory())),
            picker,
            permissions: Arc::new(ConfiguredPermissions::new(
                config.camera_permission,
                config.grant_on_request,
            )),
        }
    }
}

impl AppModel {
    /// Create the model. Nothing touches the camera until [`Message::Start`].
    pub fn new(config: Config, services: Services) -> Self {
        info!(
            opacity = config.overlay_opacity,
            mirrored = config.mirror_overlay,
            "Creating app model"
        );
        Self {
            overlay: InspirationOverlay::with_settings(config.overlay_opacity, config.mirror_overlay),
            config,
            camera: CameraState::Idle,
            is_capturing: false,
            is_switching: false,
            last_saved: None,
            last_error: None,
            picker_config: PickerConfig::default(),
            services,
        }
    }

    /// Current preview frame with the overlay drawn on top
    pub fn frame(&mut self) -> Option<Bitmap> {
        if !self.camera.is_running() {
            return None;
        }
        let frame = match self.services.session.latest_frame() {
            Ok(frame) => frame,
            Err(e) => {
                debug!(error = %e, "No preview frame");
                return None;
            }
        };
        match self.overlay.composite(&frame.bitmap) {
            Ok(composited) => Some(composited),
            Err(e) => {
                debug!(error = %e, "Failed to composite preview");
                None
            }
        }
    }

    /// Stop the camera and release the device
    pub fn shutdown(&mut self) {
        if self.camera.is_running() {
            self.services.session.close();
        }
        self.camera = CameraState::Idle;
    }
}
