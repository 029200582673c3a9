//! Import ledger port (driven/secondary port)
//!
//! Durable storage for [`ImportState`]: loaded once at startup, persisted
//! after every successful download. The format is the adapter's choice
//! but persistence must be crash-safe (write-new-then-rename or
//! equivalent) so an interrupted write never corrupts committed history.

use crate::domain::errors::LedgerError;
use crate::domain::import_state::ImportState;

/// Port trait for ledger persistence
///
/// The ledger has a single writer: one orchestrator process owns the
/// state file, so implementations need no locking.
#[async_trait::async_trait]
pub trait IImportLedger: Send + Sync {
    /// Loads the persisted ledger.
    ///
    /// A missing ledger yields a fresh empty [`ImportState`]; only an
    /// EXISTING but unparseable one is an error. That distinction is what
    /// lets the caller refuse to silently restart from scratch.
    ///
    /// # Errors
    /// [`LedgerError::Corrupt`] when the file exists but cannot be parsed.
    async fn load(&self) -> Result<ImportState, LedgerError>;

    /// Persists the ledger durably.
    ///
    /// Called synchronously after each recorded download, so a crash
    /// loses at most the in-flight file, never committed history.
    async fn persist(&self, state: &ImportState) -> Result<(), LedgerError>;
}
