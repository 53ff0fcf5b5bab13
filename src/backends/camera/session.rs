// SPDX-License-Identifier: GPL-3.0-only

//! Capture session handle
//!
//! The session provides:
//! - Device configuration and reconfiguration (front/back flip)
//! - Start/stop of preview streaming
//! - Thread-safe backend access for background capture tasks
//!
//! There is no global session. Whoever needs the camera is handed a
//! [`CaptureSession`] (a cheap clone of the same shared state).

use super::types::*;
use super::{CaptureBackend, select_default_device, select_switch_target};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// Internal session state
struct SessionState {
    /// The backend instance
    backend: Box<dyn CaptureBackend>,
}

/// Owned handle to the single active capture session
#[derive(Clone)]
pub struct CaptureSession {
    state: Arc<Mutex<SessionState>>,
}

impl CaptureSession {
    /// Create a new session over a backend
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState { backend })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        // A panic while holding the lock leaves the backend usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Enumerate available devices
    pub fn devices(&self) -> Vec<CaptureDevice> {
        self.state().backend.enumerate_devices()
    }

    /// Open the preferred startup device and start streaming
    pub fn configure_default(&self) -> BackendResult<CaptureDevice> {
        let devices = self.devices();
        let device = select_default_device(&devices).cloned().ok_or_else(|| {
            BackendError::DeviceNotFound("default video device is unavailable".to_string())
        })?;

        self.configure(&device)?;
        Ok(device)
    }

    /// Open a specific device and start streaming
    pub fn configure(&self, device: &CaptureDevice) -> BackendResult<()> {
        info!(device = %device, "Configuring capture session");

        let mut state = self.state();
        state.backend.open(device)?;
        state.backend.start_streaming()
    }

    /// Start streaming from the open device
    pub fn start(&self) -> BackendResult<()> {
        self.state().backend.start_streaming()
    }

    /// Stop streaming, keeping the device open
    pub fn stop(&self) {
        self.state().backend.stop_streaming();
    }

    /// Stop streaming and close the device
    pub fn close(&self) {
        info!("Closing capture session");
        self.state().backend.close();
    }

    /// Check if preview frames are being delivered
    pub fn is_running(&self) -> bool {
        self.state().backend.is_streaming()
    }

    /// Get current device
    pub fn current_device(&self) -> Option<CaptureDevice> {
        self.state().backend.current_device().cloned()
    }

    /// Flip between front and back cameras.
    ///
    /// Returns the newly opened device, or `None` when there is nothing to
    /// switch to. If the new device cannot be opened the previous one is
    /// reopened and the error is returned.
    pub fn switch_camera(&self) -> BackendResult<Option<CaptureDevice>> {
        let mut state = self.state();

        let current = state
            .backend
            .current_device()
            .cloned()
            .ok_or(BackendError::NotStreaming)?;
        let devices = state.backend.enumerate_devices();

        let Some(target) = select_switch_target(&devices, current.position).cloned() else {
            info!(position = %current.position, "No camera on the other side");
            return Ok(None);
        };

        info!(from = %current, to = %target, "Switching camera");
        let was_streaming = state.backend.is_streaming();

        if let Err(e) = state.backend.open(&target) {
            warn!(error = %e, device = %target, "Could not open camera, restoring previous");
            state.backend.open(&current)?;
            if was_streaming {
                state.backend.start_streaming()?;
            }
            return Err(e);
        }

        if was_streaming {
            state.backend.start_streaming()?;
        }
        Ok(Some(target))
    }

    /// Most recent preview frame
    pub fn latest_frame(&self) -> BackendResult<CameraFrame> {
        let mut state = self.state();
        if !state.backend.is_streaming() {
            return Err(BackendError::NotStreaming);
        }
        state.backend.latest_frame()
    }

    /// Capture a still photo
    pub fn capture_still(&self) -> BackendResult<Photo> {
        let mut state = self.state();
        if !state.backend.is_streaming() {
            return Err(BackendError::NotStreaming);
        }
        state.backend.capture_still()
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("CaptureSession")
            .field("device", &state.backend.current_device())
            .field("streaming", &state.backend.is_streaming())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{Bitmap, PixelLayout};
    use std::time::Instant;

    /// Backend whose devices can be marked as broken
    struct FakeBackend {
        devices: Vec<CaptureDevice>,
        broken: Vec<String>,
        current: Option<CaptureDevice>,
        streaming: bool,
    }

    impl FakeBackend {
        fn new(broken: &[&str]) -> Self {
            let device = |id: &str, position, lens| CaptureDevice {
                id: id.to_string(),
                name: id.to_string(),
                position,
                lens,
            };
            Self {
                devices: vec![
                    device("back", DevicePosition::Back, LensType::Dual),
                    device("front", DevicePosition::Front, LensType::WideAngle),
                ],
                broken: broken.iter().map(|s| s.to_string()).collect(),
                current: None,
                streaming: false,
            }
        }
    }

    impl CaptureBackend for FakeBackend {
        fn enumerate_devices(&self) -> Vec<CaptureDevice> {
            self.devices.clone()
        }

        fn open(&mut self, device: &CaptureDevice) -> BackendResult<()> {
            self.close();
            if self.broken.contains(&device.id) {
                return Err(BackendError::InitializationFailed(device.id.clone()));
            }
            self.current = Some(device.clone());
            Ok(())
        }

        fn close(&mut self) {
            self.streaming = false;
            self.current = None;
        }

        fn start_streaming(&mut self) -> BackendResult<()> {
            if self.current.is_none() {
                return Err(BackendError::NotStreaming);
            }
            self.streaming = true;
            Ok(())
        }

        fn stop_streaming(&mut self) {
            self.streaming = false;
        }

        fn is_streaming(&self) -> bool {
            self.streaming
        }

        fn current_device(&self) -> Option<&CaptureDevice> {
            self.current.as_ref()
        }

        fn latest_frame(&mut self) -> BackendResult<CameraFrame> {
            Ok(CameraFrame {
                bitmap: Bitmap::from_packed(1, 1, PixelLayout::Gray8, vec![0u8]).unwrap(),
                sequence: 0,
                captured_at: Instant::now(),
            })
        }

        fn capture_still(&mut self) -> BackendResult<Photo> {
            Ok(Photo::new(vec![0xFFu8, 0xD8], "jpg", 1, 1))
        }
    }

    #[test]
    fn test_configure_default_starts_streaming() {
        let session = CaptureSession::new(Box::new(FakeBackend::new(&[])));
        let device = session.configure_default().unwrap();
        assert_eq!(device.id, "back");
        assert!(session.is_running());
    }

    #[test]
    fn test_switch_flips_and_keeps_streaming() {
        let session = CaptureSession::new(Box::new(FakeBackend::new(&[])));
        session.configure_default().unwrap();

        let switched = session.switch_camera().unwrap().unwrap();
        assert_eq!(switched.id, "front");
        assert!(session.is_running());

        let back = session.switch_camera().unwrap().unwrap();
        assert_eq!(back.id, "back");
    }

    #[test]
    fn test_failed_switch_restores_previous_device() {
        let session = CaptureSession::new(Box::new(FakeBackend::new(&["front"])));
        session.configure_default().unwrap();

        let result = session.switch_camera();
        assert!(matches!(result, Err(BackendError::InitializationFailed(_))));
        assert_eq!(session.current_device().unwrap().id, "back");
        assert!(session.is_running());
    }

    #[test]
    fn test_capture_requires_streaming() {
        let session = CaptureSession::new(Box::new(FakeBackend::new(&[])));
        assert_eq!(session.capture_still(), Err(BackendError::NotStreaming));

        session.configure_default().unwrap();
        session.stop();
        assert_eq!(session.capture_still(), Err(BackendError::NotStreaming));

        session.start().unwrap();
        assert!(session.capture_still().is_ok());
    }

    #[test]
    fn test_switch_without_device_fails() {
        let session = CaptureSession::new(Box::new(FakeBackend::new(&[])));
        assert!(matches!(session.switch_camera(), Err(BackendError::NotStreaming)));
    }
}
