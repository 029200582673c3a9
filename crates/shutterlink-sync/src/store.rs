//! JSON ledger store (crash-safe persistence adapter)
//!
//! Implements [`IImportLedger`] as a single JSON document on disk.
//! Persistence is write-new-then-rename: the document is serialized to a
//! `.tmp` sibling and atomically renamed over the previous version, so a
//! crash mid-write can never corrupt committed history.
//!
//! Loading distinguishes three cases deliberately:
//! - no file -> fresh empty state (first run)
//! - readable, parseable -> the persisted state
//! - present but unparseable -> [`LedgerError::Corrupt`], because
//!   silently starting empty would re-download the whole card

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use shutterlink_core::domain::errors::LedgerError;
use shutterlink_core::domain::import_state::ImportState;
use shutterlink_core::domain::newtypes::{FolderId, PhotoName};
use shutterlink_core::domain::photo::PhotoKey;
use shutterlink_core::ports::import_ledger::IImportLedger;

/// Current on-disk document version
const LEDGER_VERSION: u32 = 1;

/// On-disk shape of the ledger
#[derive(Debug, Serialize, Deserialize)]
struct LedgerDocument {
    version: u32,
    started_at: DateTime<Utc>,
    active_folder: Option<String>,
    downloaded: Vec<LedgerRecord>,
}

/// One downloaded identity
#[derive(Debug, Serialize, Deserialize)]
struct LedgerRecord {
    folder: String,
    name: String,
}

/// File-backed [`IImportLedger`] implementation
pub struct JsonLedgerStore {
    /// Where the ledger document lives
    path: PathBuf,
}

impl JsonLedgerStore {
    /// Creates a store over the given ledger path
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The ledger file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the ledger file if present (explicit operator reset).
    pub async fn wipe(&self) -> Result<(), LedgerError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "ledger wiped");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LedgerError::Io(e)),
        }
    }

    fn decode(content: &str) -> Result<ImportState, LedgerError> {
        let doc: LedgerDocument =
            serde_json::from_str(content).map_err(|e| LedgerError::Corrupt(e.to_string()))?;

        if doc.version != LEDGER_VERSION {
            return Err(LedgerError::Corrupt(format!(
                "unsupported ledger version {}",
                doc.version
            )));
        }

        let mut downloaded: BTreeSet<PhotoKey> = BTreeSet::new();
        for record in doc.downloaded {
            let folder = FolderId::new(record.folder)
                .map_err(|e| LedgerError::Corrupt(e.to_string()))?;
            let name =
                PhotoName::new(record.name).map_err(|e| LedgerError::Corrupt(e.to_string()))?;
            downloaded.insert((folder, name));
        }

        let active_folder = doc
            .active_folder
            .map(FolderId::new)
            .transpose()
            .map_err(|e| LedgerError::Corrupt(e.to_string()))?;

        Ok(ImportState::from_parts(doc.started_at, active_folder, downloaded))
    }

    fn encode(state: &ImportState) -> Result<String, LedgerError> {
        let doc = LedgerDocument {
            version: LEDGER_VERSION,
            started_at: state.started_at(),
            active_folder: state.active_folder().map(|f| f.as_str().to_string()),
            downloaded: state
                .downloaded()
                .map(|(folder, name)| LedgerRecord {
                    folder: folder.as_str().to_string(),
                    name: name.as_str().to_string(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}

#[async_trait::async_trait]
impl IImportLedger for JsonLedgerStore {
    async fn load(&self) -> Result<ImportState, LedgerError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no ledger yet, starting fresh");
                return Ok(ImportState::new());
            }
            Err(e) => return Err(LedgerError::Io(e)),
        };

        let state = Self::decode(&content)?;
        info!(
            path = %self.path.display(),
            entries = state.len(),
            "ledger loaded"
        );
        Ok(state)
    }

    async fn persist(&self, state: &ImportState) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = Self::encode(state)?;

        // Write the new document beside the old one, then atomically
        // swap it in. A crash between the two steps leaves the previous
        // version intact.
        let tmp_path = {
            let mut p = self.path.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(entries = state.len(), "ledger persisted");
        Ok(())
    }
}
