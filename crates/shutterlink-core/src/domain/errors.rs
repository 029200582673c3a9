//! Domain error types
//!
//! This module defines the error taxonomy for the import engine:
//! validation failures, device communication failures, and ledger
//! (persisted state) failures.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid device folder identifier
    #[error("Invalid folder id: {0}")]
    InvalidFolderId(String),

    /// Invalid photo file name
    #[error("Invalid photo name: {0}")]
    InvalidPhotoName(String),

    /// Invalid remote content reference
    #[error("Invalid remote ref: {0}")]
    InvalidRemoteRef(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors reaching or talking to the camera device
///
/// The engine recovers from every variant locally (backoff or per-file
/// skip); none of these is ever fatal to the process. [`is_transient`]
/// decides whether a per-file transfer attempt is worth retrying.
///
/// [`is_transient`]: DeviceError::is_transient
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Link-level failure: connection refused/reset, DNS, timeout
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// The device responded but the body could not be parsed
    #[error("device protocol error: {0}")]
    Protocol(String),

    /// The device reports the requested file or folder does not exist
    #[error("not found on device: {0}")]
    NotFound(String),

    /// Any other HTTP status the device returned
    #[error("device returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
}

impl DeviceError {
    /// Whether a retry of the same request may succeed.
    ///
    /// Link failures, unparseable responses (firmware quirks), and server
    /// errors are transient. A 404 is terminal for the file in question:
    /// the catalog is stale or the file was removed on-device, and the
    /// next poll cycle re-lists the catalog anyway.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Protocol(_) => true,
            Self::NotFound(_) => false,
            Self::Http { status, .. } => *status >= 500 || *status == 408 || *status == 429,
        }
    }
}

/// Errors loading or persisting the durable import ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger file exists but cannot be parsed.
    ///
    /// Treated as fatal-to-operator-decision: proceeding with an empty
    /// ledger would silently re-download every file on the card, so the
    /// caller must get explicit operator consent first.
    #[error("ledger file is corrupt: {0}")]
    Corrupt(String),

    /// I/O failure reading or writing the ledger file
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure while writing the ledger
    #[error("ledger encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
