//! Incremental import engine
//!
//! The [`ImportEngine`] drives the poll loop: list the device catalog,
//! diff it against the ledger, drain the missing files one at a time,
//! persist after every success, sleep, repeat.
//!
//! ## Phases
//!
//! Each cycle walks an explicit state machine so backoff, termination,
//! and cancellation points are named states rather than implicit
//! call-stack positions:
//!
//! ```text
//! Idle -> Polling -> Draining -> Idle   (normal cycle)
//!           |
//!           v
//!        Backoff -> Polling             (catalog failure)
//!
//! Stopped                               (external cancellation only)
//! ```
//!
//! ## Rollover
//!
//! The folder listing is re-fetched every cycle and the newest folder
//! (listed last) is adopted whenever it differs from the active one.
//! The extra listing call per cycle is the price of catching rollover
//! promptly. If the device has not yet started reporting a brand-new
//! folder, there is still a blind window until it does; that gap is the
//! device's to close, not ours.
//!
//! ## Cancellation
//!
//! The loop observes its [`CancellationToken`] only between steps, never
//! mid-transfer, so a stop can never leave the ledger disagreeing with
//! the filesystem. No rollback is needed on stop because the ledger is
//! only ever appended to after a file is complete.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use shutterlink_core::config::Config;
use shutterlink_core::domain::errors::DeviceError;
use shutterlink_core::domain::import_state::ImportState;
use shutterlink_core::domain::newtypes::FolderId;
use shutterlink_core::ports::camera_device::ICameraDevice;
use shutterlink_core::ports::import_ledger::IImportLedger;

use crate::backoff::BackoffPolicy;
use crate::transfer::{TransferManager, TransferOutcome};
use crate::ImportError;

/// Consecutive protocol failures before the operator gets a loud warning
const PROTOCOL_WARN_THRESHOLD: u32 = 3;

/// Named engine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Between cycles, waiting out the poll interval
    Idle,
    /// Listing the catalog
    Polling,
    /// Downloading pending files
    Draining,
    /// Waiting out a failure delay
    Backoff,
    /// Externally cancelled; terminal
    Stopped,
}

/// Summary of one completed poll cycle
#[derive(Debug, Clone)]
pub struct CycleResult {
    /// Files downloaded and recorded this cycle
    pub downloaded: u32,
    /// Files that failed terminally and were skipped this cycle
    pub skipped: u32,
    /// Per-file failure descriptions (non-fatal)
    pub errors: Vec<String>,
    /// Wall-clock duration of the cycle in milliseconds
    pub duration_ms: u64,
}

/// One-directional import engine: device -> local disk
///
/// Owns the [`ImportState`] exclusively; all mutation funnels through
/// the record-then-persist sequence in the drain step, which is what
/// keeps the crash-safety invariant enforceable in one place.
pub struct ImportEngine {
    /// Catalog and content operations
    device: Arc<dyn ICameraDevice>,
    /// Durable ledger storage
    ledger: Arc<dyn IImportLedger>,
    /// Per-file transfer execution
    transfer: TransferManager,
    /// The owned download ledger
    state: ImportState,
    /// Where photos land locally
    dest_dir: PathBuf,
    /// Sleep between quiet cycles
    poll_interval: Duration,
    /// Failure delay schedule
    backoff: BackoffPolicy,
    /// Current engine phase
    phase: EnginePhase,
    /// Consecutive cycles that failed with a protocol error
    protocol_failures: u32,
}

impl ImportEngine {
    /// Creates a new engine over pre-built ports and loaded state
    ///
    /// # Arguments
    /// * `device` - Camera device port
    /// * `ledger` - Ledger persistence port
    /// * `state` - The ledger state loaded at startup
    /// * `dest_dir` - Destination directory for photos
    /// * `config` - Poll interval and transfer retry settings
    #[must_use]
    pub fn new(
        device: Arc<dyn ICameraDevice>,
        ledger: Arc<dyn IImportLedger>,
        state: ImportState,
        dest_dir: PathBuf,
        config: &Config,
    ) -> Self {
        let transfer = TransferManager::new(
            device.clone(),
            config.transfer.max_retries,
            Duration::from_secs(config.transfer.retry_delay),
        );

        Self {
            device,
            ledger,
            transfer,
            state,
            dest_dir,
            poll_interval: config.poll_interval(),
            backoff: BackoffPolicy::with_defaults(),
            phase: EnginePhase::Idle,
            protocol_failures: 0,
        }
    }

    /// The current engine phase
    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// The ledger state as the engine sees it
    #[must_use]
    pub fn state(&self) -> &ImportState {
        &self.state
    }

    /// Runs one poll cycle: list, diff, drain, persist.
    ///
    /// Device errors during the catalog steps abort the cycle (the run
    /// loop backs off); per-file failures during the drain step do not.
    ///
    /// # Errors
    /// [`ImportError::Device`] when a catalog call fails,
    /// [`ImportError::Ledger`] when the ledger cannot be persisted.
    pub async fn run_cycle(&mut self) -> Result<CycleResult, ImportError> {
        let started = Instant::now();
        let mut result = CycleResult {
            downloaded: 0,
            skipped: 0,
            errors: Vec::new(),
            duration_ms: 0,
        };

        // Poll: re-list folders every cycle so rollover is caught.
        self.phase = EnginePhase::Polling;
        let folders = self.device.list_folders().await?;

        let Some(target) = self.select_target_folder(&folders).await? else {
            debug!("device reports no storage folders");
            self.phase = EnginePhase::Idle;
            result.duration_ms = started.elapsed().as_millis() as u64;
            return Ok(result);
        };

        let files = self.device.list_files(&target).await?;
        let pending = self.state.pending_of(&files);

        if pending.is_empty() {
            debug!(folder = %target, listed = files.len(), "nothing pending");
            self.phase = EnginePhase::Idle;
            result.duration_ms = started.elapsed().as_millis() as u64;
            return Ok(result);
        }

        info!(
            folder = %target,
            pending = pending.len(),
            "draining new photos"
        );

        // Drain: strictly one file at a time, in capture order. A file
        // that fails terminally is skipped; the rest of the batch still
        // runs, and the next cycle lists the file again.
        self.phase = EnginePhase::Draining;
        for entry in pending {
            let local_name = self.state.local_name_for(&entry);
            match self.transfer.fetch(&entry, &self.dest_dir, &local_name).await {
                TransferOutcome::Completed { bytes, attempts } => {
                    self.state.record(&entry);
                    self.ledger.persist(&self.state).await?;
                    info!(
                        name = %entry.name,
                        folder = %entry.folder,
                        bytes,
                        attempts,
                        "photo imported"
                    );
                    result.downloaded += 1;
                }
                TransferOutcome::Failed { attempts, reason } => {
                    warn!(
                        name = %entry.name,
                        folder = %entry.folder,
                        attempts,
                        reason = %reason,
                        "photo skipped this cycle"
                    );
                    result.errors.push(format!("{}: {reason}", entry.name));
                    result.skipped += 1;
                }
            }
        }

        self.phase = EnginePhase::Idle;
        result.duration_ms = started.elapsed().as_millis() as u64;
        Ok(result)
    }

    /// Picks the folder to scan this cycle and keeps the ledger's notion
    /// of the active folder current.
    ///
    /// The newest folder is the last one listed (port contract). The
    /// active folder is kept while it is still the newest; when a newer
    /// folder appears (rollover) or the active one vanishes, the newest
    /// is adopted and the change persisted.
    async fn select_target_folder(
        &mut self,
        folders: &[FolderId],
    ) -> Result<Option<FolderId>, ImportError> {
        let Some(newest) = folders.last() else {
            return Ok(None);
        };

        if self.state.active_folder() != Some(newest) {
            if let Some(previous) = self.state.active_folder() {
                info!(from = %previous, to = %newest, "active folder changed");
            } else {
                info!(folder = %newest, "adopting active folder");
            }
            self.state.set_active_folder(newest.clone());
            self.ledger.persist(&self.state).await?;
        }

        Ok(Some(newest.clone()))
    }

    /// Runs the poll loop until the token is cancelled.
    ///
    /// Catalog failures back off on a capped exponential schedule and
    /// never terminate the loop; only a ledger persistence failure is
    /// escalated. Cancellation is observed between cycle steps.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), ImportError> {
        info!(
            dest = %self.dest_dir.display(),
            poll_secs = self.poll_interval.as_secs(),
            already_imported = self.state.len(),
            "import engine starting"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            match self.run_cycle().await {
                Ok(result) => {
                    self.backoff.reset();
                    self.protocol_failures = 0;

                    if result.downloaded > 0 || result.skipped > 0 {
                        info!(
                            downloaded = result.downloaded,
                            skipped = result.skipped,
                            duration_ms = result.duration_ms,
                            "cycle complete"
                        );
                    }

                    self.phase = EnginePhase::Idle;
                    tokio::select! {
                        _ = tokio::time::sleep(self.poll_interval) => {}
                        _ = cancel.cancelled() => break,
                    }
                }
                Err(ImportError::Device(err)) => {
                    self.note_protocol_failure(&err);

                    self.phase = EnginePhase::Backoff;
                    let delay = self.backoff.next_delay();
                    warn!(
                        error = %err,
                        delay_secs = delay.as_secs(),
                        "catalog poll failed, backing off"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = cancel.cancelled() => break,
                    }
                }
                Err(err @ ImportError::Ledger(_)) => {
                    // Durable state is the one thing the engine cannot
                    // limp along without: a crash now would re-download.
                    return Err(err);
                }
            }
        }

        self.phase = EnginePhase::Stopped;
        info!("import engine stopped");
        Ok(())
    }

    /// Tracks consecutive protocol errors and warns the operator loudly
    /// when the device keeps answering garbage. Never fatal: event
    /// sessions must not be aborted by a firmware glitch.
    fn note_protocol_failure(&mut self, err: &DeviceError) {
        if matches!(err, DeviceError::Protocol(_)) {
            self.protocol_failures += 1;
            if self.protocol_failures == PROTOCOL_WARN_THRESHOLD {
                warn!(
                    consecutive = self.protocol_failures,
                    "device keeps returning malformed responses; check firmware or profile setting"
                );
            }
        } else {
            self.protocol_failures = 0;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
