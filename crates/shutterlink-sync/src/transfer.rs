//! Single-file transfer with bounded retry and atomic commit
//!
//! [`TransferManager`] moves one photo from the device to local disk.
//! Bytes land in a `.part` temporary next to the final name and are only
//! renamed into place after the full declared length is confirmed, so a
//! dropped connection can never leave a truncated file masquerading as a
//! complete photo.
//!
//! Retries are scoped to the single file: transient device errors are
//! retried a bounded number of times with a short fixed delay, then the
//! file is reported failed and the batch moves on. The next poll cycle
//! will list the file again and retry it from scratch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use shutterlink_core::domain::errors::DeviceError;
use shutterlink_core::domain::photo::PhotoEntry;
use shutterlink_core::ports::camera_device::ICameraDevice;

/// Result of one transfer task, terminal for this cycle either way
#[derive(Debug)]
pub enum TransferOutcome {
    /// The file is complete on disk under its final name
    Completed {
        /// Bytes written
        bytes: u64,
        /// Attempts it took, 1 for a clean first try
        attempts: u32,
    },
    /// The file could not be fetched this cycle; nothing was left on disk
    Failed {
        /// Attempts made before giving up
        attempts: u32,
        /// Why the last attempt failed
        reason: String,
    },
}

impl TransferOutcome {
    /// Whether the transfer completed
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Downloads one file at a time from the device to local storage
///
/// Strictly sequential: the camera's onboard controller degrades under
/// overlapping requests, so the engine never calls
/// [`fetch`](TransferManager::fetch) concurrently.
pub struct TransferManager {
    /// Device port for content fetches
    device: Arc<dyn ICameraDevice>,
    /// Additional attempts after the first, for transient failures only
    max_retries: u32,
    /// Fixed delay between attempts on the same file
    retry_delay: Duration,
}

impl TransferManager {
    /// Creates a new TransferManager
    ///
    /// # Arguments
    /// * `device` - Camera device port
    /// * `max_retries` - Retries after the first attempt (transient only)
    /// * `retry_delay` - Fixed delay between attempts
    #[must_use]
    pub fn new(device: Arc<dyn ICameraDevice>, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            device,
            max_retries,
            retry_delay,
        }
    }

    /// Fetches `entry` into `dest_dir` under `local_name`.
    ///
    /// On success exactly one file exists at `dest_dir/local_name` with
    /// complete contents. On failure neither the final name nor the
    /// temporary exists. Local I/O failures are folded into
    /// [`TransferOutcome::Failed`]; the file will be retried on a future
    /// cycle because it was never recorded in the ledger.
    pub async fn fetch(
        &self,
        entry: &PhotoEntry,
        dest_dir: &Path,
        local_name: &str,
    ) -> TransferOutcome {
        let final_path = dest_dir.join(local_name);
        let tmp_path = part_path(&final_path);

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.attempt(entry, &final_path, &tmp_path).await {
                Ok(bytes) => {
                    debug!(name = local_name, bytes, attempts, "transfer complete");
                    return TransferOutcome::Completed { bytes, attempts };
                }
                Err(err) => {
                    let retryable = err.is_transient() && attempts <= self.max_retries;
                    remove_quietly(&tmp_path).await;

                    if retryable {
                        warn!(
                            name = local_name,
                            attempt = attempts,
                            error = %err,
                            "transfer attempt failed, retrying"
                        );
                        tokio::time::sleep(self.retry_delay).await;
                        continue;
                    }

                    return TransferOutcome::Failed {
                        attempts,
                        reason: err.to_string(),
                    };
                }
            }
        }
    }

    /// One fetch-write-verify-rename attempt.
    async fn attempt(
        &self,
        entry: &PhotoEntry,
        final_path: &Path,
        tmp_path: &Path,
    ) -> Result<u64, DeviceError> {
        let content = self.device.fetch_photo(entry).await?;

        // Prefer the response's own length declaration; fall back to the
        // size the catalog listed, when the device provided one.
        let expected = content.declared_len.or(entry.size);
        if let Some(expected) = expected {
            if content.data.len() as u64 != expected {
                return Err(DeviceError::Protocol(format!(
                    "truncated body for {}: got {} of {expected} bytes",
                    entry.name,
                    content.data.len(),
                )));
            }
        }

        if let Some(parent) = final_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_failure("create destination directory", e))?;
        }

        // Write to a temporary in the same directory so the rename is
        // atomic (same filesystem).
        tokio::fs::write(tmp_path, &content.data)
            .await
            .map_err(|e| io_failure("write temporary file", e))?;
        tokio::fs::rename(tmp_path, final_path)
            .await
            .map_err(|e| io_failure("rename into place", e))?;

        Ok(content.data.len() as u64)
    }
}

/// The temporary path a transfer writes into before the rename
fn part_path(final_path: &Path) -> PathBuf {
    let mut p = final_path.as_os_str().to_owned();
    p.push(".part");
    PathBuf::from(p)
}

/// Local I/O failures ride the transient lane: disk-full or permission
/// problems are surfaced per-file and the entry stays retryable.
fn io_failure(what: &str, err: std::io::Error) -> DeviceError {
    DeviceError::Unreachable(format!("local I/O: {what}: {err}"))
}

/// Best-effort removal of a leftover temporary.
async fn remove_quietly(path: &Path) {
    if tokio::fs::metadata(path).await.is_ok() {
        if let Err(err) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %err, "could not remove temporary file");
        }
    }
}
