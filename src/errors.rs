// SPDX-License-Identifier: MPL-2.0

//! Error types for the inspiration camera

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for decoding and compositing
pub type MediaResult<T> = Result<T, MediaError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Image decoding or compositing errors
    Media(MediaError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// Camera access was not granted
    PermissionDenied,
    /// Camera initialization failed
    InitializationFailed(String),
    /// Backend error
    BackendError(String),
}

/// Errors while decoding, converting or compositing images
#[derive(Debug, Clone)]
pub enum MediaError {
    /// Raw pixel data does not describe a valid bitmap
    InvalidBitmap(String),
    /// Encoded bytes could not be decoded
    DecodeFailed(String),
    /// Orientation could not be applied
    Normalize(NormalizeError),
}

/// The normalizer's only failure: there is no usable source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeError {
    /// No source buffer was supplied
    MissingSource,
    /// The source buffer's data does not match its declared layout
    InvalidSource,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Media(e) => write!(f, "Image error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::PermissionDenied => write!(f, "Camera access not authorized"),
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CameraError::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::InvalidBitmap(msg) => write!(f, "Invalid bitmap: {}", msg),
            MediaError::DecodeFailed(msg) => write!(f, "Decoding failed: {}", msg),
            MediaError::Normalize(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::MissingSource => write!(f, "No source bitmap"),
            NormalizeError::InvalidSource => write!(f, "Source bitmap is invalid"),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for MediaError {}
impl std::error::Error for NormalizeError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        AppError::Media(err)
    }
}

impl From<NormalizeError> for MediaError {
    fn from(err: NormalizeError) -> Self {
        MediaError::Normalize(err)
    }
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        AppError::Media(MediaError::Normalize(err))
    }
}

impl From<image::ImageError> for MediaError {
    fn from(err: image::ImageError) -> Self {
        MediaError::DecodeFailed(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
