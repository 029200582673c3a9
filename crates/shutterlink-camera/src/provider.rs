//! Camera device port adapter
//!
//! [`CameraDeviceProvider`] implements the [`ICameraDevice`] port on top
//! of [`CameraClient`], a [`DeviceProfile`], and an optional format
//! filter. This is the only place adapter errors are mapped into the
//! engine's [`DeviceError`] taxonomy.

use tracing::debug;

use shutterlink_core::config::DeviceConfig;
use shutterlink_core::domain::errors::DeviceError;
use shutterlink_core::domain::newtypes::FolderId;
use shutterlink_core::domain::photo::{PhotoContent, PhotoEntry};
use shutterlink_core::ports::camera_device::ICameraDevice;

use crate::catalog::{self, FolderListing};
use crate::client::CameraClient;
use crate::profile::{DeviceProfile, PhotoFormat};
use crate::CameraError;

/// [`ICameraDevice`] adapter over the camera's web API
pub struct CameraDeviceProvider {
    /// HTTP plumbing with base URL and timeout
    client: CameraClient,
    /// Vendor endpoint layout and quirks
    profile: DeviceProfile,
    /// Which file formats to surface in listings
    format: PhotoFormat,
}

impl CameraDeviceProvider {
    /// Creates a provider from pre-built parts
    #[must_use]
    pub fn new(client: CameraClient, profile: DeviceProfile, format: PhotoFormat) -> Self {
        Self {
            client,
            profile,
            format,
        }
    }

    /// Creates a provider from the device section of the config file
    pub fn from_config(config: &DeviceConfig) -> Result<Self, CameraError> {
        let client = CameraClient::new(
            config.base_url.clone(),
            std::time::Duration::from_secs(config.request_timeout),
        )?;
        let profile = DeviceProfile::from_config(&config.profile, &config.storage)?;
        let format = config.format.parse()?;
        Ok(Self::new(client, profile, format))
    }

    /// The profile this provider talks to
    #[must_use]
    pub fn profile(&self) -> DeviceProfile {
        self.profile
    }

    /// Fetches and parses the full catalog listing.
    ///
    /// FluCard firmware needs its index poked via the refresh endpoint
    /// first or the photo list goes stale; Ricoh devices return the whole
    /// catalog in one call.
    async fn fetch_listings(&self) -> Result<Vec<FolderListing>, CameraError> {
        if let Some(refresh) = self.profile.refresh_path() {
            self.client.get_ok(refresh).await?;
        }
        let body = self.client.get_text(&self.profile.listing_path()).await?;
        match self.profile {
            DeviceProfile::RicohWifi { .. } => catalog::parse_ricoh(&body),
            DeviceProfile::FluCard => catalog::parse_flucard(&body),
        }
    }
}

#[async_trait::async_trait]
impl ICameraDevice for CameraDeviceProvider {
    async fn list_folders(&self) -> Result<Vec<FolderId>, DeviceError> {
        let listings = self.fetch_listings().await?;
        let folders: Vec<FolderId> = listings.into_iter().map(|l| l.folder).collect();
        debug!(count = folders.len(), "device folders listed");
        Ok(folders)
    }

    async fn list_files(&self, folder: &FolderId) -> Result<Vec<PhotoEntry>, DeviceError> {
        let listings = self.fetch_listings().await?;
        let listing = listings
            .into_iter()
            .find(|l| &l.folder == folder)
            .ok_or_else(|| {
                DeviceError::NotFound(format!("folder {folder} not in device listing"))
            })?;

        let entries: Vec<PhotoEntry> = listing
            .entries
            .into_iter()
            .filter(|e| self.format.matches(&e.name))
            .collect();
        debug!(%folder, count = entries.len(), "device files listed");
        Ok(entries)
    }

    async fn fetch_photo(&self, entry: &PhotoEntry) -> Result<PhotoContent, DeviceError> {
        let path = self.profile.content_path(entry);
        let content = self.client.get_bytes(&path).await?;
        Ok(content)
    }
}
