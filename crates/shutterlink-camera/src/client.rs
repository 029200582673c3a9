//! Camera web API HTTP client
//!
//! Thin wrapper over `reqwest` that pins the device base URL and the
//! per-request timeout. Every request the adapter makes flows through
//! here, so the "timeout strictly below the poll interval" rule is
//! enforced in exactly one place.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use shutterlink_camera::client::CameraClient;
//!
//! # async fn example() -> Result<(), shutterlink_camera::CameraError> {
//! let client = CameraClient::new("http://192.168.0.1", Duration::from_secs(10))?;
//! let body = client.get_text("/v1/ping").await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use shutterlink_core::domain::photo::PhotoContent;

use crate::CameraError;

/// HTTP client for camera device API calls
///
/// Wraps `reqwest::Client` with base URL construction and a uniform
/// request timeout. Paths may be relative (joined onto the base URL) or
/// absolute `http://` URLs, which FluCard photo lists hand out directly.
pub struct CameraClient {
    /// The underlying HTTP client, carrying the request timeout
    client: Client,
    /// Base URL of the device, e.g. `http://192.168.0.1`
    base_url: String,
}

impl CameraClient {
    /// Creates a new CameraClient
    ///
    /// # Arguments
    /// * `base_url` - Device base URL without a trailing slash
    /// * `timeout` - Per-request timeout; must be below the poll interval
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CameraError> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    /// Returns the device base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a path-or-absolute-URL against the base URL
    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Sends a GET and checks the status, mapping 404 and other non-2xx
    /// statuses to their [`CameraError`] variants.
    async fn get_checked(&self, path: &str) -> Result<reqwest::Response, CameraError> {
        let url = self.url_for(path);
        debug!(%url, "device request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CameraError::NotFound(url));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CameraError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// GET a plain-text body
    pub async fn get_text(&self, path: &str) -> Result<String, CameraError> {
        let response = self.get_checked(path).await?;
        Ok(response.text().await?)
    }

    /// GET a binary body, streamed chunk by chunk.
    ///
    /// Records the Content-Length the device declared so the transfer
    /// layer can verify completeness before committing the file.
    pub async fn get_bytes(&self, path: &str) -> Result<PhotoContent, CameraError> {
        let mut response = self.get_checked(path).await?;
        let declared_len = response.content_length();

        let mut data = match declared_len {
            Some(len) => Vec::with_capacity(len as usize),
            None => Vec::new(),
        };
        while let Some(chunk) = response.chunk().await? {
            data.extend_from_slice(&chunk);
        }

        debug!(
            bytes = data.len(),
            declared = ?declared_len,
            "device content fetched"
        );
        Ok(PhotoContent { data, declared_len })
    }

    /// Fire a GET and only care that it succeeded (FluCard refresh poke)
    pub async fn get_ok(&self, path: &str) -> Result<(), CameraError> {
        self.get_checked(path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        let client = CameraClient::new("http://192.168.0.1/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://192.168.0.1");
    }

    #[test]
    fn test_url_for_relative_path() {
        let client = CameraClient::new("http://192.168.0.1", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url_for("/v1/photos?storage=sd2"),
            "http://192.168.0.1/v1/photos?storage=sd2"
        );
    }

    #[test]
    fn test_url_for_absolute_passthrough() {
        let client = CameraClient::new("http://192.168.0.1", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url_for("http://192.168.1.1/DCIM/100__07/A.jpg"),
            "http://192.168.1.1/DCIM/100__07/A.jpg"
        );
    }
}
