//! Status command - inspect the import ledger
//!
//! Shows how many photos the ledger has recorded, which folder the
//! engine considers active, and where the ledger lives, without
//! touching the camera.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use shutterlink_core::config::Config;
use shutterlink_core::domain::errors::LedgerError;
use shutterlink_core::ports::import_ledger::IImportLedger;
use shutterlink_sync::store::JsonLedgerStore;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let json = matches!(format, OutputFormat::Json);
        let formatter = get_formatter(json);

        let config = Config::load_or_default(config_path);
        let store = JsonLedgerStore::new(config.ledger_path());

        let state = match store.load().await {
            Ok(state) => state,
            Err(LedgerError::Corrupt(reason)) => {
                formatter.error(&format!(
                    "ledger at {} is corrupt: {reason}. \
                     Run 'shutterlink reset --yes' or 'shutterlink run --fresh' to discard it.",
                    store.path().display()
                ));
                return Ok(());
            }
            Err(err) => return Err(err).context("failed to read ledger"),
        };

        if json {
            formatter.print_json(&serde_json::json!({
                "ledger_path": store.path().display().to_string(),
                "imported": state.len(),
                "active_folder": state.active_folder().map(|f| f.as_str()),
                "started_at": state.started_at().to_rfc3339(),
                "dest_dir": config.sync.dest_dir,
            }));
            return Ok(());
        }

        formatter.success(&format!("{} photos imported", state.len()));
        formatter.info(&format!("ledger:        {}", store.path().display()));
        formatter.info(&format!(
            "active folder: {}",
            state
                .active_folder()
                .map(|f| f.as_str().to_string())
                .unwrap_or_else(|| "(none yet)".to_string())
        ));
        formatter.info(&format!(
            "started:       {}",
            state.started_at().to_rfc3339()
        ));
        if let Some(dest) = &config.sync.dest_dir {
            formatter.info(&format!("destination:   {}", dest.display()));
        }
        Ok(())
    }
}
