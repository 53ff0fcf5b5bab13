// SPDX-License-Identifier: GPL-3.0-only

//! Virtual capture devices
//!
//! Devices backed by an image file or a generated test pattern. They stand
//! in for real hardware on desktops, in the terminal viewer and in tests,
//! and behave like a camera: they must be opened and streaming before they
//! produce frames, and stills come back encoded (JPEG unless configured
//! otherwise).

use super::types::*;
use super::CaptureBackend;
use crate::constants::{QualityPreset, virtual_camera as vc};
use crate::media::{Bitmap, PixelLayout, load_image_file};
use crate::pipelines::photo::{EncodingFormat, PhotoEncoder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// What a virtual device shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VirtualSource {
    /// Moving gradient test pattern
    Pattern,
    /// A still image file, shown upright
    Image(PathBuf),
}

/// Configuration of a single virtual device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualDeviceConfig {
    pub id: String,
    pub name: String,
    pub position: DevicePosition,
    pub lens: LensType,
    pub source: VirtualSource,
}

impl VirtualDeviceConfig {
    /// A back dual camera and a front wide-angle camera, both showing patterns
    pub fn default_devices() -> Vec<VirtualDeviceConfig> {
        vec![
            VirtualDeviceConfig {
                id: "virtual-back".to_string(),
                name: "Virtual Back Camera".to_string(),
                position: DevicePosition::Back,
                lens: LensType::Dual,
                source: VirtualSource::Pattern,
            },
            VirtualDeviceConfig {
                id: "virtual-front".to_string(),
                name: "Virtual Front Camera".to_string(),
                position: DevicePosition::Front,
                lens: LensType::WideAngle,
                source: VirtualSource::Pattern,
            },
        ]
    }

    fn device(&self) -> CaptureDevice {
        CaptureDevice {
            id: self.id.clone(),
            name: self.name.clone(),
            position: self.position,
            lens: self.lens,
        }
    }
}

/// The open device and its loaded content
struct OpenDevice {
    device: CaptureDevice,
    /// Decoded image for file-backed devices
    still: Option<Bitmap>,
}

/// Backend serving frames from configured virtual devices
pub struct VirtualCaptureBackend {
    configs: Vec<VirtualDeviceConfig>,
    open: Option<OpenDevice>,
    streaming: bool,
    sequence: u64,
    encoder: PhotoEncoder,
}

impl VirtualCaptureBackend {
    pub fn new(configs: Vec<VirtualDeviceConfig>) -> Self {
        Self {
            configs,
            open: None,
            streaming: false,
            sequence: 0,
            encoder: PhotoEncoder::new(),
        }
    }

    /// Set the encoding of captured stills
    pub fn with_output(mut self, format: EncodingFormat, quality: QualityPreset) -> Self {
        self.encoder.set_format(format);
        self.encoder.set_quality(quality);
        self
    }

    fn render(&self, open: &OpenDevice) -> BackendResult<Bitmap> {
        if let Some(still) = &open.still {
            return Ok(still.clone());
        }
        test_pattern(
            vc::PATTERN_WIDTH,
            vc::PATTERN_HEIGHT,
            self.sequence,
            open.device.position,
        )
    }
}

impl CaptureBackend for VirtualCaptureBackend {
    fn enumerate_devices(&self) -> Vec<CaptureDevice> {
        self.configs.iter().map(VirtualDeviceConfig::device).collect()
    }

    fn open(&mut self, device: &CaptureDevice) -> BackendResult<()> {
        self.close();

        let config = self
            .configs
            .iter()
            .find(|c| c.id == device.id)
            .ok_or_else(|| BackendError::DeviceNotFound(device.id.clone()))?;

        let still = match &config.source {
            VirtualSource::Pattern => None,
            VirtualSource::Image(path) => Some(load_image_file(path).map_err(|e| {
                BackendError::InitializationFailed(format!("{}: {}", device.name, e))
            })?),
        };

        info!(device = %device, "Opened virtual device");
        self.open = Some(OpenDevice {
            device: config.device(),
            still,
        });
        Ok(())
    }

    fn close(&mut self) {
        self.stop_streaming();
        if let Some(open) = self.open.take() {
            debug!(device = %open.device.name, "Closed virtual device");
        }
    }

    fn start_streaming(&mut self) -> BackendResult<()> {
        if self.open.is_none() {
            return Err(BackendError::NotStreaming);
        }
        self.streaming = true;
        self.sequence = 0;
        Ok(())
    }

    fn stop_streaming(&mut self) {
        self.streaming = false;
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn current_device(&self) -> Option<&CaptureDevice> {
        self.open.as_ref().map(|o| &o.device)
    }

    fn latest_frame(&mut self) -> BackendResult<CameraFrame> {
        let open = match (&self.open, self.streaming) {
            (Some(open), true) => open,
            _ => return Err(BackendError::NotStreaming),
        };

        let bitmap = self.render(open)?;
        let frame = CameraFrame {
            bitmap,
            sequence: self.sequence,
            captured_at: Instant::now(),
        };
        self.sequence += 1;
        Ok(frame)
    }

    fn capture_still(&mut self) -> BackendResult<Photo> {
        let frame = self.latest_frame()?;
        let data = self
            .encoder
            .encode_bitmap(&frame.bitmap)
            .map_err(BackendError::CaptureFailed)?;

        Ok(Photo::new(
            data,
            self.encoder.format().extension(),
            frame.width(),
            frame.height(),
        ))
    }
}

/// Diagonal gradient with a vertical bar that advances every frame.
///
/// Front devices use a warmer palette so a flip is visible.
fn test_pattern(
    width: u32,
    height: u32,
    sequence: u64,
    position: DevicePosition,
) -> BackendResult<Bitmap> {
    let bar_x = ((sequence * 8) % width as u64) as u32;
    let mut data = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height {
        for x in 0..width {
            let gx = (x * 255 / width.max(1)) as u8;
            let gy = (y * 255 / height.max(1)) as u8;
            let pixel = if x.abs_diff(bar_x) < 4 {
                [255, 255, 255, 255]
            } else if position == DevicePosition::Front {
                [200, gx / 2 + gy / 4, gy / 3, 255]
            } else {
                [gx / 3, gy / 2 + gx / 4, 200, 255]
            };
            data.extend_from_slice(&pixel);
        }
    }

    Ok(Bitmap::from_packed(width, height, PixelLayout::Rgba8, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> VirtualCaptureBackend {
        VirtualCaptureBackend::new(VirtualDeviceConfig::default_devices())
    }

    #[test]
    fn test_enumerates_configured_devices() {
        let devices = backend().enumerate_devices();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].position, DevicePosition::Back);
        assert_eq!(devices[1].position, DevicePosition::Front);
    }

    #[test]
    fn test_frames_require_streaming() {
        let mut backend = backend();
        let device = backend.enumerate_devices()[0].clone();
        backend.open(&device).unwrap();
        assert_eq!(backend.latest_frame().unwrap_err(), BackendError::NotStreaming);

        backend.start_streaming().unwrap();
        let first = backend.latest_frame().unwrap();
        let second = backend.latest_frame().unwrap();
        assert_eq!(second.sequence, first.sequence + 1);
        assert_eq!(first.width(), vc::PATTERN_WIDTH);
    }

    #[test]
    fn test_unknown_device_is_rejected() {
        let mut backend = backend();
        let ghost = CaptureDevice {
            id: "ghost".to_string(),
            name: "Ghost".to_string(),
            position: DevicePosition::Back,
            lens: LensType::WideAngle,
        };
        assert!(matches!(backend.open(&ghost), Err(BackendError::DeviceNotFound(_))));
        assert!(backend.current_device().is_none());
    }

    #[test]
    fn test_missing_image_fails_to_open() {
        let mut backend = VirtualCaptureBackend::new(vec![VirtualDeviceConfig {
            id: "file".to_string(),
            name: "File".to_string(),
            position: DevicePosition::Back,
            lens: LensType::WideAngle,
            source: VirtualSource::Image(PathBuf::from("/nonexistent/reference.png")),
        }]);
        let device = backend.enumerate_devices()[0].clone();
        assert!(matches!(
            backend.open(&device),
            Err(BackendError::InitializationFailed(_))
        ));
    }

    #[test]
    fn test_still_is_jpeg() {
        let mut backend = backend();
        let device = backend.enumerate_devices()[1].clone();
        backend.open(&device).unwrap();
        backend.start_streaming().unwrap();

        let photo = backend.capture_still().unwrap();
        assert_eq!(photo.extension, "jpg");
        assert_eq!(&photo.data[..2], &[0xFF, 0xD8]);
        assert_eq!((photo.width, photo.height), (vc::PATTERN_WIDTH, vc::PATTERN_HEIGHT));
    }

    #[test]
    fn test_png_output() {
        let mut backend = backend().with_output(EncodingFormat::Png, QualityPreset::Low);
        let device = backend.enumerate_devices()[0].clone();
        backend.open(&device).unwrap();
        backend.start_streaming().unwrap();

        let photo = backend.capture_still().unwrap();
        assert_eq!(photo.extension, "png");
        assert_eq!(&photo.data[1..4], b"PNG");
    }
}
