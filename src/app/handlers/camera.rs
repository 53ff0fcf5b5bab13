// SPDX-License-Identifier: GPL-3.0-only

//! Camera lifecycle handlers
//!
//! Handles the permission check on startup, opening the startup device and
//! flipping between front and back cameras.

use crate::app::operation::Operation;
use crate::app::state::{AppModel, CameraState, Message};
use crate::backends::camera::{BackendError, CaptureDevice};
use crate::backends::permission::AuthorizationStatus;
use tracing::{error, info, warn};

impl AppModel {
    pub(crate) fn handle_start(&mut self) -> Option<Operation<Message>> {
        if matches!(
            self.camera,
            CameraState::RequestingPermission | CameraState::Starting | CameraState::Running(_)
        ) {
            info!(state = ?self.camera, "Camera already starting or running");
            return None;
        }

        match self.services.permissions.camera_status() {
            AuthorizationStatus::Authorized => self.setup_camera(),
            AuthorizationStatus::NotDetermined => {
                info!("Camera permission not determined, requesting access");
                self.camera = CameraState::RequestingPermission;
                let permissions = self.services.permissions.clone();
                Some(Operation::spawn_blocking(move || {
                    Ok(Message::PermissionResolved(permissions.request_camera_access()))
                }))
            }
            status @ (AuthorizationStatus::Restricted | AuthorizationStatus::Denied) => {
                warn!(%status, "Camera access not available");
                self.camera = CameraState::Unauthorized(status);
                None
            }
        }
    }

    pub(crate) fn handle_permission_resolved(
        &mut self,
        granted: bool,
    ) -> Option<Operation<Message>> {
        if granted {
            info!("Camera access granted");
            self.setup_camera()
        } else {
            warn!("Camera access denied by user");
            self.camera = CameraState::Unauthorized(AuthorizationStatus::Denied);
            None
        }
    }

    /// Open the last used device if it is still present, else the default one
    fn setup_camera(&mut self) -> Option<Operation<Message>> {
        self.camera = CameraState::Starting;
        let session = self.services.session.clone();
        let preferred = self.config.last_device_id.clone();

        Some(Operation::spawn_blocking(move || {
            let remembered = preferred
                .and_then(|id| session.devices().into_iter().find(|d| d.id == id));

            let result = match remembered {
                Some(device) => match session.configure(&device) {
                    Ok(()) => Ok(device),
                    Err(e) => {
                        warn!(error = %e, device = %device, "Last used camera failed, using default");
                        session.configure_default()
                    }
                },
                None => session.configure_default(),
            };
            Ok(Message::CameraReady(result))
        }))
    }

    pub(crate) fn handle_camera_ready(
        &mut self,
        result: Result<CaptureDevice, BackendError>,
    ) -> Option<Operation<Message>> {
        match result {
            Ok(device) => {
                info!(device = %device, "Camera running");
                self.config.last_device_id = Some(device.id.clone());
                self.camera = CameraState::Running(device);
            }
            Err(e) => {
                error!(error = %e, "Failed to set up camera");
                self.camera = CameraState::Failed(e.to_string());
                self.last_error = Some(e);
            }
        }
        None
    }

    pub(crate) fn handle_switch_camera(&mut self) -> Option<Operation<Message>> {
        if !self.camera.is_running() {
            info!("Camera not running, ignoring switch");
            return None;
        }
        if self.is_switching {
            info!("Camera switch already in progress");
            return None;
        }

        info!("Switching camera");
        self.is_switching = true;
        let session = self.services.session.clone();
        Some(Operation::spawn_blocking(move || {
            Ok(Message::CameraSwitched(session.switch_camera()))
        }))
    }

    pub(crate) fn handle_camera_switched(
        &mut self,
        result: Result<Option<CaptureDevice>, BackendError>,
    ) -> Option<Operation<Message>> {
        self.is_switching = false;
        match result {
            Ok(Some(device)) => {
                info!(device = %device, "Switched camera");
                self.config.last_device_id = Some(device.id.clone());
                self.camera = CameraState::Running(device);
            }
            Ok(None) => info!("No other camera to switch to"),
            Err(e) => {
                error!(error = %e, "Camera switch failed");
                // Follow whatever the session ended up with
                let session = &self.services.session;
                self.camera = match session.current_device() {
                    Some(device) if session.is_running() => CameraState::Running(device),
                    _ => CameraState::Failed(e.to_string()),
                };
                self.last_error = Some(e);
            }
        }
        None
    }
}
