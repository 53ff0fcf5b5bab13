// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::overlay::InspirationOverlay;
use crate::backends::camera::{BackendError, CaptureDevice, CaptureSession};
use crate::backends::library::{PhotoLibrary, SavedAsset};
use crate::backends::permission::{AuthorizationStatus, PermissionAuthority};
use crate::backends::picker::{PhotoPicker, PickerConfig};
use crate::config::Config;
use crate::media::Bitmap;
use std::sync::Arc;

/// Camera lifecycle as seen by the UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CameraState {
    /// Nothing started yet
    #[default]
    Idle,
    /// Waiting for the user to answer the permission prompt
    RequestingPermission,
    /// Access was refused or is blocked
    Unauthorized(AuthorizationStatus),
    /// Opening the device
    Starting,
    /// Streaming preview from this device
    Running(CaptureDevice),
    /// The device could not be set up
    Failed(String),
}

impl CameraState {
    pub fn is_running(&self) -> bool {
        matches!(self, CameraState::Running(_))
    }

    pub fn device(&self) -> Option<&CaptureDevice> {
        match self {
            CameraState::Running(device) => Some(device),
            _ => None,
        }
    }
}

/// Messages handled by [`AppModel::update`]
#[derive(Debug, Clone)]
pub enum Message {
    /// Check camera permission and start the preview
    Start,
    /// The permission prompt was answered
    PermissionResolved(bool),
    /// The startup device finished opening
    CameraReady(Result<CaptureDevice, BackendError>),
    /// Overlay slider moved
    OpacityChanged(f32),
    /// Flip the overlay horizontally
    ToggleMirror,
    /// Flip between front and back cameras
    SwitchCamera,
    /// Camera switch finished; `None` when there was nothing to switch to
    CameraSwitched(Result<Option<CaptureDevice>, BackendError>),
    /// Shutter pressed
    Capture,
    /// Capture finished and the photo was written (or not)
    PhotoSaved(Result<SavedAsset, BackendError>),
    /// Open the picker for a new reference image
    PickInspiration,
    /// Picker closed; `None` when cancelled or unreadable
    InspirationPicked(Option<Bitmap>),
}

/// Host services the model talks to
#[derive(Clone)]
pub struct Services {
    pub session: CaptureSession,
    pub library: Arc<dyn PhotoLibrary>,
    pub picker: Arc<dyn PhotoPicker>,
    pub permissions: Arc<dyn PermissionAuthority>,
}

/// The main application model
pub struct AppModel {
    /// Settings the app was started with, updated as the user changes them
    pub config: Config,
    /// Reference image drawn over the preview
    pub overlay: InspirationOverlay,
    /// Camera lifecycle
    pub camera: CameraState,
    /// A capture is in flight
    pub is_capturing: bool,
    /// A camera switch is in flight
    pub is_switching: bool,
    /// Most recent photo written to the library
    pub last_saved: Option<SavedAsset>,
    /// Most recent failure of a background operation
    pub last_error: Option<BackendError>,
    pub(crate) picker_config: PickerConfig,
    pub(crate) services: Services,
}

impl std::fmt::Debug for AppModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModel")
            .field("camera", &self.camera)
            .field("overlay", &self.overlay)
            .field("is_capturing", &self.is_capturing)
            .field("is_switching", &self.is_switching)
            .field("last_saved", &self.last_saved)
            .finish_non_exhaustive()
    }
}
