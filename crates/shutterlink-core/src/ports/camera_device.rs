//! Camera device port (driven/secondary port)
//!
//! This module defines the interface for talking to the camera's onboard
//! wireless storage controller. The reference implementations target the
//! Ricoh/Pentax WiFi REST API and Toshiba FluCard CGI endpoints, but the
//! trait is adapter-agnostic: a different device model is a new adapter,
//! not a new engine.
//!
//! ## Design Notes
//!
//! - Methods return typed [`DeviceError`] rather than `anyhow` because the
//!   engine's recovery policy (backoff vs per-file skip vs retry) hangs on
//!   the error class.
//! - Folder and file listing are separate calls because devices expose
//!   them separately, and rollover detection needs to distinguish "new
//!   file in a known folder" from "new folder appeared".
//! - Every call must carry a request timeout strictly below the engine's
//!   poll interval so a stalled device cannot wedge the loop.

use crate::domain::errors::DeviceError;
use crate::domain::newtypes::FolderId;
use crate::domain::photo::{PhotoContent, PhotoEntry};

/// Port trait for camera device operations
///
/// Purely read-only with respect to the device: Shutterlink never writes
/// back to the card. All three operations may block on the network and
/// nothing else in the engine does.
#[async_trait::async_trait]
pub trait ICameraDevice: Send + Sync {
    /// Lists the storage folders present on the device.
    ///
    /// Ordered by device-assigned recency, newest LAST, matching how
    /// cameras append folders as they roll over.
    ///
    /// # Errors
    /// [`DeviceError::Unreachable`] when the link is down,
    /// [`DeviceError::Protocol`] when the response cannot be parsed.
    async fn list_folders(&self) -> Result<Vec<FolderId>, DeviceError>;

    /// Lists the files within one folder, in device-reported order
    /// (typically capture order).
    ///
    /// # Errors
    /// Same failure modes as [`list_folders`](ICameraDevice::list_folders).
    async fn list_files(&self, folder: &FolderId) -> Result<Vec<PhotoEntry>, DeviceError>;

    /// Fetches one photo's bytes.
    ///
    /// # Errors
    /// [`DeviceError::NotFound`] when the catalog was stale and the file
    /// is gone; transient variants per [`DeviceError::is_transient`].
    async fn fetch_photo(&self, entry: &PhotoEntry) -> Result<PhotoContent, DeviceError>;
}
