//! Shutterlink Camera - camera web API adapter
//!
//! Provides the async client for the camera's onboard wireless storage
//! controller:
//! - Catalog listing (folders, files per folder)
//! - Photo content fetch with declared-length capture
//! - Device profiles describing vendor endpoint quirks as data
//!
//! ## Modules
//!
//! - [`client`] - HTTP client over the device's web API
//! - [`catalog`] - Wire-format parsing into typed listings
//! - [`profile`] - Device families, endpoints, and capability data
//! - [`provider`] - [`ICameraDevice`] port implementation
//!
//! [`ICameraDevice`]: shutterlink_core::ports::camera_device::ICameraDevice

pub mod catalog;
pub mod client;
pub mod profile;
pub mod provider;

use shutterlink_core::domain::errors::DeviceError;
use thiserror::Error;

/// Errors that can occur when communicating with the camera device
#[derive(Debug, Error)]
pub enum CameraError {
    /// A network-level error occurred (connect, reset, timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The requested file or folder does not exist on the device
    #[error("not found: {0}")]
    NotFound(String),

    /// The device returned an unexpected HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The device responded but the body is not in the expected format
    #[error("malformed device response: {0}")]
    Malformed(String),
}

impl From<CameraError> for DeviceError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::Network(e) => DeviceError::Unreachable(e.to_string()),
            CameraError::NotFound(what) => DeviceError::NotFound(what),
            CameraError::Http { status, message } => DeviceError::Http { status, message },
            CameraError::Malformed(what) => DeviceError::Protocol(what),
        }
    }
}
