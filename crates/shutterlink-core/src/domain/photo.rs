//! Photo catalog entry types
//!
//! A [`PhotoEntry`] identifies one file on the device as the catalog
//! reports it. Entries are port-level data: the camera adapter produces
//! them, the engine diffs them against the ledger, the transfer layer
//! fetches their bytes.

use serde::{Deserialize, Serialize};

use super::newtypes::{FolderId, PhotoName, RemoteRef};

/// Identity key of a photo on the device: `(folder, name)`
///
/// Photo names repeat across folders after a counter rollover, so the
/// folder is part of the identity. This is the deduplication key held in
/// the ledger's downloaded set.
pub type PhotoKey = (FolderId, PhotoName);

/// One file on the device, as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoEntry {
    /// Storage folder the file lives in
    pub folder: FolderId,
    /// Device-reported file name, unique within the folder
    pub name: PhotoName,
    /// Opaque token the device API needs to fetch the bytes
    pub remote_ref: RemoteRef,
    /// Byte length the listing declared, when the device provides one
    pub size: Option<u64>,
}

impl PhotoEntry {
    /// The deduplication key for this entry
    #[must_use]
    pub fn key(&self) -> PhotoKey {
        (self.folder.clone(), self.name.clone())
    }
}

/// Downloaded photo bytes plus the length the device declared
///
/// The declared length (HTTP Content-Length or the listing's size field)
/// lets the transfer layer reject a truncated body before anything is
/// renamed into place.
#[derive(Debug, Clone)]
pub struct PhotoContent {
    /// The raw file bytes
    pub data: Vec<u8>,
    /// Length the device declared for this content, if any
    pub declared_len: Option<u64>,
}

impl PhotoContent {
    /// Whether the body length matches what the device declared.
    ///
    /// A missing declaration counts as complete: stream end is then the
    /// only completeness signal available.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.declared_len {
            Some(expected) => self.data.len() as u64 == expected,
            None => true,
        }
    }
}
