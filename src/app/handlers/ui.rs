// SPDX-License-Identifier: GPL-3.0-only

//! Overlay handlers
//!
//! The overlay is only ever changed here, on the thread that calls
//! `update`. The picker runs in the background and sends the decoded image
//! back as a message.

use crate::app::operation::Operation;
use crate::app::state::{AppModel, Message};
use crate::backends::picker::PickOutcome;
use crate::media::Bitmap;
use tracing::{debug, info, warn};

impl AppModel {
    pub(crate) fn handle_opacity_changed(&mut self, value: f32) -> Option<Operation<Message>> {
        self.overlay.set_opacity(value);
        self.config.overlay_opacity = self.overlay.opacity();
        debug!(opacity = self.overlay.opacity(), "Overlay opacity changed");
        None
    }

    pub(crate) fn handle_toggle_mirror(&mut self) -> Option<Operation<Message>> {
        self.overlay.toggle_mirror();
        self.config.mirror_overlay = self.overlay.is_mirrored();
        info!(mirrored = self.overlay.is_mirrored(), "Overlay mirror toggled");
        None
    }

    pub(crate) fn handle_pick_inspiration(&mut self) -> Option<Operation<Message>> {
        info!("Opening inspiration picker");
        let picker = self.services.picker.clone();
        let config = self.picker_config.clone();

        Some(Operation::spawn_blocking(move || {
            let image = match picker.pick(&config) {
                // The overlay shows a single image
                Ok(PickOutcome::Picked(assets)) => assets.first().and_then(|asset| match asset.load() {
                    Ok(bitmap) => Some(bitmap),
                    Err(e) => {
                        warn!(error = %e, path = %asset.path.display(), "Could not load picked image");
                        None
                    }
                }),
                Ok(PickOutcome::Cancelled) => {
                    debug!("Picker cancelled");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "Picker failed");
                    None
                }
            };
            Ok(Message::InspirationPicked(image))
        }))
    }

    pub(crate) fn handle_inspiration_picked(
        &mut self,
        image: Option<Bitmap>,
    ) -> Option<Operation<Message>> {
        if let Some(image) = image {
            info!(width = image.width(), height = image.height(), "New inspiration image");
            self.overlay.set_image(image);
        }
        None
    }
}
