//! Shutterlink Sync - incremental import engine
//!
//! Provides:
//! - The poll/diff/drain orchestration loop with explicit phases
//! - Per-file transfers with bounded retry and atomic commit
//! - Capped exponential backoff for catalog failures
//! - The crash-safe JSON ledger store
//!
//! ## Modules
//!
//! - [`engine`] - Import engine orchestrating poll cycles
//! - [`transfer`] - Single-file transfer with retry and atomic rename
//! - [`backoff`] - Capped exponential backoff policy
//! - [`store`] - JSON ledger store (write-new-then-rename persistence)

pub mod backoff;
pub mod engine;
pub mod store;
pub mod transfer;

use shutterlink_core::domain::errors::{DeviceError, LedgerError};
use thiserror::Error;

/// Errors a poll cycle can surface to the run loop
///
/// Device errors are recovered locally via backoff; ledger errors are the
/// only class escalated to the operator, since continuing without durable
/// state would break the no-duplicate-downloads guarantee on restart.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Catalog or content call failed; the loop backs off and retries
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// The ledger could not be persisted; escalated to the operator
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
