//! Reset command - discard the import ledger
//!
//! Deleting the ledger means the next run imports every file on the
//! card again, so the command refuses to act without `--yes`. This is
//! the explicit replacement for the old behavior of silently resetting
//! stale state.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use shutterlink_core::config::Config;
use shutterlink_sync::store::JsonLedgerStore;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Confirm the reset; without this flag nothing is deleted
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl ResetCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let config = Config::load_or_default(config_path);
        let store = JsonLedgerStore::new(config.ledger_path());

        if !self.yes {
            formatter.warn(&format!(
                "this would delete {} and re-import the whole card on the next run; \
                 pass --yes to confirm",
                store.path().display()
            ));
            return Ok(());
        }

        store.wipe().await.context("failed to delete ledger")?;
        formatter.success(&format!("ledger deleted: {}", store.path().display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutterlink_core::domain::import_state::ImportState;
    use shutterlink_core::ports::import_ledger::IImportLedger;

    fn config_pointing_at(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let config_path = dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            format!(
                "ledger:\n  path: {}\n",
                dir.path().join("ledger.json").display()
            ),
        )
        .unwrap();
        config_path
    }

    #[tokio::test]
    async fn test_reset_without_yes_keeps_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = config_pointing_at(&dir);

        let store = JsonLedgerStore::new(dir.path().join("ledger.json"));
        store.persist(&ImportState::new()).await.unwrap();

        ResetCommand { yes: false }
            .execute(&config_path, OutputFormat::Human)
            .await
            .unwrap();
        assert!(dir.path().join("ledger.json").exists());
    }

    #[tokio::test]
    async fn test_reset_with_yes_deletes_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = config_pointing_at(&dir);

        let store = JsonLedgerStore::new(dir.path().join("ledger.json"));
        store.persist(&ImportState::new()).await.unwrap();

        ResetCommand { yes: true }
            .execute(&config_path, OutputFormat::Human)
            .await
            .unwrap();
        assert!(!dir.path().join("ledger.json").exists());
    }
}
