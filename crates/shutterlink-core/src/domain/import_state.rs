//! The import ledger state
//!
//! [`ImportState`] is the process-wide record of what has already been
//! retrieved from the device. It is an explicit value owned by the
//! orchestrator and injected where needed, never an ambient singleton;
//! all mutation funnels through [`record`](ImportState::record) so the
//! crash-safety invariant is enforceable in one place.
//!
//! ## Invariant
//!
//! The downloaded set is append-only and monotone: a key enters it only
//! after its local file is complete and durably named, and nothing ever
//! removes a key during normal operation. The set is therefore always a
//! superset of "files that exist locally with complete contents".

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::newtypes::FolderId;
use super::photo::{PhotoEntry, PhotoKey};

/// Durable record of which files have already been retrieved
///
/// Created empty on first run, loaded from the ledger store at process
/// start, appended to after each verified download, and persisted
/// synchronously so a crash loses at most the in-flight file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportState {
    /// Every `(folder, name)` ever successfully written to local disk
    downloaded: BTreeSet<PhotoKey>,
    /// The folder currently believed to be the device's active one
    active_folder: Option<FolderId>,
    /// When this ledger was first created
    started_at: DateTime<Utc>,
}

impl ImportState {
    /// Create a fresh, empty ledger starting now
    #[must_use]
    pub fn new() -> Self {
        Self {
            downloaded: BTreeSet::new(),
            active_folder: None,
            started_at: Utc::now(),
        }
    }

    /// Reassemble a ledger from persisted parts
    #[must_use]
    pub fn from_parts(
        started_at: DateTime<Utc>,
        active_folder: Option<FolderId>,
        downloaded: BTreeSet<PhotoKey>,
    ) -> Self {
        Self {
            downloaded,
            active_folder,
            started_at,
        }
    }

    /// Record a completed download. Returns `false` if the key was
    /// already present (the operation is idempotent).
    pub fn record(&mut self, entry: &PhotoEntry) -> bool {
        self.downloaded.insert(entry.key())
    }

    /// Whether this key has already been retrieved
    #[must_use]
    pub fn contains(&self, key: &PhotoKey) -> bool {
        self.downloaded.contains(key)
    }

    /// The entries of `listing` not yet downloaded, in listing order.
    ///
    /// Order preservation matters: the device reports files in capture
    /// order, and a long session should mirror photos in that order.
    #[must_use]
    pub fn pending_of(&self, listing: &[PhotoEntry]) -> Vec<PhotoEntry> {
        listing
            .iter()
            .filter(|e| !self.downloaded.contains(&e.key()))
            .cloned()
            .collect()
    }

    /// The local file name to store `entry` under.
    ///
    /// Bare device name normally; prefixed with the folder id when a
    /// DIFFERENT folder already produced the same name, so two distinct
    /// photos never collide on disk. Deterministic given ledger contents.
    #[must_use]
    pub fn local_name_for(&self, entry: &PhotoEntry) -> String {
        let collides = self
            .downloaded
            .iter()
            .any(|(folder, name)| name == &entry.name && folder != &entry.folder);
        if collides {
            format!("{}_{}", entry.folder, entry.name)
        } else {
            entry.name.to_string()
        }
    }

    /// The folder the engine currently treats as active
    #[must_use]
    pub fn active_folder(&self) -> Option<&FolderId> {
        self.active_folder.as_ref()
    }

    /// Update the active folder after a rollover was observed
    pub fn set_active_folder(&mut self, folder: FolderId) {
        self.active_folder = Some(folder);
    }

    /// Number of downloaded entries in the ledger
    #[must_use]
    pub fn len(&self) -> usize {
        self.downloaded.len()
    }

    /// Whether nothing has been downloaded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.downloaded.is_empty()
    }

    /// When this ledger was first created
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Iterate the downloaded keys in sorted order
    pub fn downloaded(&self) -> impl Iterator<Item = &PhotoKey> {
        self.downloaded.iter()
    }
}

impl Default for ImportState {
    fn default() -> Self {
        Self::new()
    }
}
