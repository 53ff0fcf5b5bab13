// SPDX-License-Identifier: MPL-2.0

//! Capture backend abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   AppModel / CLI    │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   CaptureSession    │  ← Owned handle: configure, flip, capture
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureBackend Trait│  ← Common interface
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌─────────┐
//!       │ Virtual │  ← Image file / test pattern devices
//!       └─────────┘
//! ```

pub mod session;
pub mod types;
pub mod virtual_device;

pub use session::CaptureSession;
pub use types::*;
pub use virtual_device::{VirtualCaptureBackend, VirtualDeviceConfig, VirtualSource};

/// Capture device service
///
/// Backends enumerate devices, hold at most one open device, stream preview
/// frames from it and produce encoded still photos.
pub trait CaptureBackend: Send {
    // ===== Enumeration =====

    /// Enumerate available devices
    fn enumerate_devices(&self) -> Vec<CaptureDevice>;

    // ===== Lifecycle =====

    /// Open a device, replacing any device that is currently open.
    ///
    /// On failure the backend is left with no open device.
    fn open(&mut self, device: &CaptureDevice) -> BackendResult<()>;

    /// Close the open device, stopping streaming first
    fn close(&mut self);

    /// Start delivering preview frames from the open device
    fn start_streaming(&mut self) -> BackendResult<()>;

    /// Stop delivering preview frames
    fn stop_streaming(&mut self);

    /// Check if preview frames are being delivered
    fn is_streaming(&self) -> bool;

    /// Get the currently open device
    fn current_device(&self) -> Option<&CaptureDevice>;

    // ===== Frames =====

    /// Most recent preview frame
    fn latest_frame(&mut self) -> BackendResult<CameraFrame>;

    /// Capture a single still photo, encoded by the device
    fn capture_still(&mut self) -> BackendResult<Photo>;
}

/// Pick the device to open at startup.
///
/// Prefers a back dual camera, then a back wide-angle camera, then any back
/// camera.
pub fn select_default_device(devices: &[CaptureDevice]) -> Option<&CaptureDevice> {
    let back = |lens: LensType| {
        devices
            .iter()
            .find(|d| d.position == DevicePosition::Back && d.lens == lens)
    };

    back(LensType::Dual)
        .or_else(|| back(LensType::WideAngle))
        .or_else(|| devices.iter().find(|d| d.position == DevicePosition::Back))
}

/// Pick the device a flip should switch to from `current`.
///
/// Looks for a wide-angle device on the opposite side first, then any device
/// on that side.
pub fn select_switch_target(
    devices: &[CaptureDevice],
    current: DevicePosition,
) -> Option<&CaptureDevice> {
    let preferred_position = current.flipped();
    let preferred_lens = LensType::WideAngle;

    devices
        .iter()
        .find(|d| d.position == preferred_position && d.lens == preferred_lens)
        .or_else(|| devices.iter().find(|d| d.position == preferred_position))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, position: DevicePosition, lens: LensType) -> CaptureDevice {
        CaptureDevice {
            id: id.to_string(),
            name: id.to_string(),
            position,
            lens,
        }
    }

    #[test]
    fn test_default_prefers_back_dual() {
        let devices = vec![
            device("front", DevicePosition::Front, LensType::TrueDepth),
            device("wide", DevicePosition::Back, LensType::WideAngle),
            device("dual", DevicePosition::Back, LensType::Dual),
        ];
        assert_eq!(select_default_device(&devices).unwrap().id, "dual");
    }

    #[test]
    fn test_default_falls_back_to_back_wide() {
        let devices = vec![
            device("front", DevicePosition::Front, LensType::WideAngle),
            device("wide", DevicePosition::Back, LensType::WideAngle),
        ];
        assert_eq!(select_default_device(&devices).unwrap().id, "wide");
    }

    #[test]
    fn test_default_requires_back_camera() {
        let devices = vec![device("front", DevicePosition::Front, LensType::WideAngle)];
        assert!(select_default_device(&devices).is_none());
    }

    #[test]
    fn test_switch_prefers_wide_angle_on_other_side() {
        let devices = vec![
            device("back-dual", DevicePosition::Back, LensType::Dual),
            device("front-depth", DevicePosition::Front, LensType::TrueDepth),
            device("front-wide", DevicePosition::Front, LensType::WideAngle),
        ];
        let target = select_switch_target(&devices, DevicePosition::Back).unwrap();
        assert_eq!(target.id, "front-wide");
    }

    #[test]
    fn test_switch_accepts_any_lens_on_other_side() {
        let devices = vec![
            device("back-dual", DevicePosition::Back, LensType::Dual),
            device("front-depth", DevicePosition::Front, LensType::TrueDepth),
        ];
        let target = select_switch_target(&devices, DevicePosition::Back).unwrap();
        assert_eq!(target.id, "front-depth");
    }

    #[test]
    fn test_switch_from_unspecified_goes_back() {
        let devices = vec![
            device("usb", DevicePosition::Unspecified, LensType::WideAngle),
            device("back", DevicePosition::Back, LensType::Dual),
        ];
        let target = select_switch_target(&devices, DevicePosition::Unspecified).unwrap();
        assert_eq!(target.id, "back");
    }

    #[test]
    fn test_switch_without_candidate() {
        let devices = vec![device("back", DevicePosition::Back, LensType::Dual)];
        assert!(select_switch_target(&devices, DevicePosition::Back).is_none());
    }
}
