//! Run command - the import loop
//!
//! Wires the camera adapter, ledger store, and import engine together
//! and runs until interrupted. Command-line flags override the config
//! file for this run and, in the case of the destination directory, are
//! remembered for the next one.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use shutterlink_camera::provider::CameraDeviceProvider;
use shutterlink_core::config::Config;
use shutterlink_core::domain::errors::LedgerError;
use shutterlink_core::ports::camera_device::ICameraDevice;
use shutterlink_core::ports::import_ledger::IImportLedger;
use shutterlink_sync::engine::ImportEngine;
use shutterlink_sync::store::JsonLedgerStore;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Destination directory for imported photos. Remembered in the
    /// config file, so it only needs to be given on the first run.
    #[arg(short = 'd', long)]
    pub dest: Option<std::path::PathBuf>,

    /// Camera base URL, e.g. http://192.168.0.1
    #[arg(short = 'i', long)]
    pub device_url: Option<String>,

    /// Device profile: ricoh or flucard
    #[arg(long)]
    pub profile: Option<String>,

    /// SD card slot for dual-slot bodies: sd1 or sd2
    #[arg(short = 's', long)]
    pub storage: Option<String>,

    /// File formats to import: jpg, dng, or all
    #[arg(short = 'f', long)]
    pub format: Option<String>,

    /// Seconds between poll cycles
    #[arg(short = 'r', long)]
    pub interval: Option<u64>,

    /// Run a single poll cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Discard an existing ledger and start fresh. Every file on the
    /// card will be imported again.
    #[arg(long)]
    pub fresh: bool,
}

impl RunCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let mut config = Config::load_or_default(config_path);
        self.apply_overrides(&mut config);
        config.validate()?;

        let Some(dest_dir) = config.sync.dest_dir.clone() else {
            bail!("no destination directory configured; pass one with --dest on the first run");
        };
        if !dest_dir.is_dir() {
            bail!(
                "destination directory does not exist: {}",
                dest_dir.display()
            );
        }

        // Remember the effective settings (destination dir in particular)
        // for the next run. Not fatal if the config dir is read-only.
        if let Err(err) = config.save(config_path) {
            warn!(error = %err, "could not save config file");
        }

        // Load the ledger, refusing to silently discard a corrupt one.
        let store = Arc::new(JsonLedgerStore::new(config.ledger_path()));
        if self.fresh {
            store.wipe().await.context("failed to discard ledger")?;
            formatter.warn("ledger discarded; every file on the card will be imported again");
        }
        let state = match store.load().await {
            Ok(state) => state,
            Err(LedgerError::Corrupt(reason)) => {
                bail!(
                    "import ledger at {} is corrupt ({reason}); \
                     re-run with --fresh to discard it and accept a full re-import",
                    store.path().display()
                );
            }
            Err(err) => return Err(err).context("failed to load ledger"),
        };

        info!(
            imported = state.len(),
            ledger = %store.path().display(),
            "ledger ready"
        );

        let device = Arc::new(
            CameraDeviceProvider::from_config(&config.device)
                .context("failed to build camera client")?,
        );

        let mut engine = ImportEngine::new(
            device as Arc<dyn ICameraDevice>,
            store as Arc<dyn IImportLedger>,
            state,
            dest_dir,
            &config,
        );

        if self.once {
            let result = engine.run_cycle().await?;
            formatter.success(&format!(
                "cycle complete: {} imported, {} skipped",
                result.downloaded, result.skipped
            ));
            for error in &result.errors {
                formatter.warn(error);
            }
            return Ok(());
        }

        // Run until Ctrl-C / SIGTERM. The token is only observed between
        // cycle steps, so an in-flight photo always finishes or fails
        // cleanly before the process exits.
        let cancel = CancellationToken::new();
        let signal_token = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal(signal_token).await;
        });

        engine.run(cancel).await?;
        formatter.success(&format!(
            "stopped; {} photos in the ledger",
            engine.state().len()
        ));
        Ok(())
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(dest) = &self.dest {
            config.sync.dest_dir = Some(dest.clone());
        }
        if let Some(url) = &self.device_url {
            config.device.base_url = url.clone();
        }
        if let Some(profile) = &self.profile {
            config.device.profile = profile.clone();
        }
        if let Some(storage) = &self.storage {
            config.device.storage = storage.clone();
        }
        if let Some(format) = &self.format {
            config.device.format = format.clone();
        }
        if let Some(interval) = self.interval {
            config.sync.poll_interval = interval;
        }
    }
}

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM");
        }
    }

    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_command() -> RunCommand {
        RunCommand {
            dest: None,
            device_url: None,
            profile: None,
            storage: None,
            format: None,
            interval: None,
            once: false,
            fresh: false,
        }
    }

    #[test]
    fn test_overrides_applied() {
        let cmd = RunCommand {
            dest: Some(std::path::PathBuf::from("/photos")),
            device_url: Some("http://10.0.0.1".to_string()),
            profile: Some("flucard".to_string()),
            interval: Some(5),
            ..bare_command()
        };

        let mut config = Config::default();
        cmd.apply_overrides(&mut config);

        assert_eq!(config.sync.dest_dir, Some(std::path::PathBuf::from("/photos")));
        assert_eq!(config.device.base_url, "http://10.0.0.1");
        assert_eq!(config.device.profile, "flucard");
        assert_eq!(config.sync.poll_interval, 5);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = Config::default();
        bare_command().apply_overrides(&mut config);
        assert_eq!(config.device.base_url, "http://192.168.0.1");
        assert_eq!(config.sync.poll_interval, 20);
    }

    #[tokio::test]
    async fn test_missing_dest_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");

        let err = bare_command()
            .execute(&config_path, crate::output::OutputFormat::Human)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("destination directory"));
    }

    #[tokio::test]
    async fn test_nonexistent_dest_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");

        let cmd = RunCommand {
            dest: Some(dir.path().join("missing")),
            ..bare_command()
        };
        let err = cmd
            .execute(&config_path, crate::output::OutputFormat::Human)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
