// SPDX-License-Identifier: GPL-3.0-only
// Shared types for capture backend abstraction

//! Shared types for capture backends

use crate::media::Bitmap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which way a camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DevicePosition {
    /// Position not reported (external or virtual cameras)
    #[default]
    Unspecified,
    /// Facing the user (selfie camera)
    Front,
    /// Facing away from the user
    Back,
}

impl DevicePosition {
    /// Position a flip button should switch to.
    ///
    /// Cameras without a known position flip to the back camera.
    pub fn flipped(&self) -> Self {
        match self {
            DevicePosition::Unspecified | DevicePosition::Front => DevicePosition::Back,
            DevicePosition::Back => DevicePosition::Front,
        }
    }
}

impl std::fmt::Display for DevicePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DevicePosition::Unspecified => write!(f, "unspecified"),
            DevicePosition::Front => write!(f, "front"),
            DevicePosition::Back => write!(f, "back"),
        }
    }
}

/// Lens module kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LensType {
    /// Single wide-angle lens
    #[default]
    WideAngle,
    /// Wide + telephoto pair presented as one device
    Dual,
    /// Front camera with depth sensing
    TrueDepth,
}

impl std::fmt::Display for LensType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensType::WideAngle => write!(f, "wide-angle"),
            LensType::Dual => write!(f, "dual"),
            LensType::TrueDepth => write!(f, "true-depth"),
        }
    }
}

/// Represents a capture device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDevice {
    pub id: String,
    pub name: String,
    pub position: DevicePosition,
    pub lens: LensType,
}

impl std::fmt::Display for CaptureDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.position, self.lens)
    }
}

/// A single preview frame from the camera
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub bitmap: Bitmap,
    /// Monotonic frame counter for this streaming session
    pub sequence: u64,
    /// Timestamp when frame was captured
    pub captured_at: Instant,
}

impl CameraFrame {
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

/// A captured still photo in encoded form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Unique identifier of the capture
    pub id: String,
    /// Encoded image bytes as produced by the device
    pub data: Arc<[u8]>,
    /// File extension matching the encoding (e.g. "jpg")
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

impl Photo {
    /// Wrap encoded bytes with a fresh random id
    pub fn new(data: impl Into<Arc<[u8]>>, extension: &'static str, width: u32, height: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            data: data.into(),
            extension,
            width,
            height,
        }
    }

    /// First eight characters of the id, used in file names
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Operation requires an open, streaming device
    NotStreaming,
    /// The user or system refused access
    PermissionDenied(String),
    /// Capture produced no usable image
    CaptureFailed(String),
    /// The operation was cancelled before it completed
    Cancelled,
    /// The operation's outcome was already handed out
    OutcomeTaken,
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::NotStreaming => write!(f, "Camera is not streaming"),
            BackendError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::Cancelled => write!(f, "Operation cancelled"),
            BackendError::OutcomeTaken => write!(f, "Operation outcome already taken"),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

impl From<crate::errors::MediaError> for BackendError {
    fn from(err: crate::errors::MediaError) -> Self {
        BackendError::Other(err.to_string())
    }
}

impl From<BackendError> for crate::errors::AppError {
    fn from(err: BackendError) -> Self {
        use crate::errors::{AppError, CameraError};
        match err {
            BackendError::DeviceNotFound(_) => AppError::Camera(CameraError::NoCameraFound),
            BackendError::PermissionDenied(_) => AppError::Camera(CameraError::PermissionDenied),
            BackendError::InitializationFailed(msg) => {
                AppError::Camera(CameraError::InitializationFailed(msg))
            }
            other => AppError::Camera(CameraError::BackendError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_positions() {
        assert_eq!(DevicePosition::Front.flipped(), DevicePosition::Back);
        assert_eq!(DevicePosition::Back.flipped(), DevicePosition::Front);
        assert_eq!(DevicePosition::Unspecified.flipped(), DevicePosition::Back);
    }

    #[test]
    fn test_photo_ids_are_unique() {
        let a = Photo::new(vec![1u8], "jpg", 1, 1);
        let b = Photo::new(vec![1u8], "jpg", 1, 1);
        assert_ne!(a.id, b.id);
        assert_eq!(a.short_id().len(), 8);
    }

    #[test]
    fn test_device_position_serde_names() {
        let json = serde_json::to_string(&DevicePosition::Front).unwrap();
        assert_eq!(json, "\"front\"");
        let lens: LensType = serde_json::from_str("\"true-depth\"").unwrap();
        assert_eq!(lens, LensType::TrueDepth);
    }
}
