// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function is a dispatcher; the handlers live in the
//! `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::camera`: Permission check, startup, front/back switching
//! - `handlers::capture`: Shutter and library save
//! - `handlers::ui`: Overlay opacity, mirror and reference picking

use crate::app::operation::Operation;
use crate::app::state::{AppModel, Message};
use tracing::{debug, warn};

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    ///
    /// Work that has to wait on a device or the user comes back as an
    /// [`Operation`] whose value is the follow-up message.
    pub fn update(&mut self, message: Message) -> Option<Operation<Message>> {
        debug!(?message, "Handling message");
        match message {
            // ===== Camera =====
            Message::Start => self.handle_start(),
            Message::PermissionResolved(granted) => self.handle_permission_resolved(granted),
            Message::CameraReady(result) => self.handle_camera_ready(result),
            Message::SwitchCamera => self.handle_switch_camera(),
            Message::CameraSwitched(result) => self.handle_camera_switched(result),

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::PhotoSaved(result) => self.handle_photo_saved(result),

            // ===== Overlay =====
            Message::OpacityChanged(value) => self.handle_opacity_changed(value),
            Message::ToggleMirror => self.handle_toggle_mirror(),
            Message::PickInspiration => self.handle_pick_inspiration(),
            Message::InspirationPicked(image) => self.handle_inspiration_picked(image),
        }
    }

    /// Handle a message and every follow-up it triggers, waiting for each
    /// background operation in turn.
    pub async fn dispatch(&mut self, message: Message) {
        let mut next = self.update(message);
        while let Some(operation) = next.take() {
            match operation.wait().await {
                Ok(message) => next = self.update(message),
                Err(e) => warn!(error = %e, "Background operation did not complete"),
            }
        }
    }
}
