//! Configuration module for Shutterlink.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, and defaults. The config file also
//! remembers the destination directory between runs, so `-d` only needs
//! to be given once.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for Shutterlink.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub sync: SyncConfig,
    pub transfer: TransferConfig,
    pub ledger: LedgerConfig,
    pub logging: LoggingConfig,
}

/// Camera device settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Base URL of the device's web API, e.g. `http://192.168.0.1`.
    pub base_url: String,
    /// Device family: `ricoh` or `flucard`.
    pub profile: String,
    /// SD card slot for dual-slot devices: `sd1` or `sd2`.
    pub storage: String,
    /// Which files to import: `jpg`, `dng`, or `all`.
    pub format: String,
    /// Seconds before an individual request to the device is abandoned.
    pub request_timeout: u64,
}

/// Synchronization loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Destination directory for imported photos (Lightroom auto-import
    /// folder or similar). Remembered here between runs.
    pub dest_dir: Option<PathBuf>,
    /// Seconds between poll cycles when the catalog is quiet.
    pub poll_interval: u64,
}

/// Per-file transfer retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Retry attempts for a single file before giving up on it this cycle.
    pub max_retries: u32,
    /// Seconds between retry attempts on the same file.
    pub retry_delay: u64,
}

/// Ledger persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path of the ledger file. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Write the configuration back to `path` as YAML.
    ///
    /// Used to remember the destination directory after a run that set it
    /// on the command line.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/shutterlink/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("shutterlink")
            .join("config.yaml")
    }

    /// Platform-appropriate default path for the ledger file.
    pub fn default_ledger_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("shutterlink")
            .join("ledger.json")
    }

    /// The effective ledger path, configured or default.
    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger
            .path
            .clone()
            .unwrap_or_else(Self::default_ledger_path)
    }

    /// Validate cross-field constraints.
    ///
    /// The request timeout must be strictly below the poll interval so a
    /// stalled device cannot wedge the loop across cycles.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sync.poll_interval == 0 {
            anyhow::bail!("sync.poll_interval must be at least 1 second");
        }
        if self.device.request_timeout >= self.sync.poll_interval {
            anyhow::bail!(
                "device.request_timeout ({}s) must be strictly less than sync.poll_interval ({}s)",
                self.device.request_timeout,
                self.sync.poll_interval
            );
        }
        match self.device.profile.as_str() {
            "ricoh" | "flucard" => {}
            other => anyhow::bail!("unknown device profile: {other} (expected ricoh or flucard)"),
        }
        match self.device.storage.as_str() {
            "sd1" | "sd2" => {}
            other => anyhow::bail!("unknown storage slot: {other} (expected sd1 or sd2)"),
        }
        match self.device.format.as_str() {
            "jpg" | "dng" | "all" => {}
            other => anyhow::bail!("unknown format filter: {other} (expected jpg, dng or all)"),
        }
        Ok(())
    }

    /// The per-request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.device.request_timeout)
    }

    /// The poll interval as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.sync.poll_interval)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.0.1".to_string(),
            profile: "ricoh".to_string(),
            storage: "sd2".to_string(),
            format: "jpg".to_string(),
            request_timeout: 10,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dest_dir: None,
            poll_interval: 20,
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: 2,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { path: None }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.device.profile, "ricoh");
        assert_eq!(config.sync.poll_interval, 20);
        assert!(config.sync.dest_dir.is_none());
    }

    #[test]
    fn test_timeout_must_be_below_poll_interval() {
        let mut config = Config::default();
        config.device.request_timeout = 20;
        config.sync.poll_interval = 20;
        assert!(config.validate().is_err());

        config.device.request_timeout = 19;
        config.validate().unwrap();
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = Config::default();
        config.sync.poll_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let mut config = Config::default();
        config.device.profile = "gopro".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_storage_rejected() {
        let mut config = Config::default();
        config.device.storage = "sd3".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "device:\n  base_url: http://192.168.1.1\n  profile: flucard\nsync:\n  poll_interval: 30\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.device.base_url, "http://192.168.1.1");
        assert_eq!(config.device.profile, "flucard");
        assert_eq!(config.sync.poll_interval, 30);
        // Untouched sections keep defaults.
        assert_eq!(config.transfer.max_retries, 3);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.yaml");

        let mut config = Config::default();
        config.sync.dest_dir = Some(PathBuf::from("/photos/auto-import"));
        config.save(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(
            reloaded.sync.dest_dir,
            Some(PathBuf::from("/photos/auto-import"))
        );
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(config.device.profile, "ricoh");
    }

    #[test]
    fn test_ledger_path_override() {
        let mut config = Config::default();
        assert!(config.ledger_path().ends_with("ledger.json"));

        config.ledger.path = Some(PathBuf::from("/tmp/custom-ledger.json"));
        assert_eq!(config.ledger_path(), PathBuf::from("/tmp/custom-ledger.json"));
    }
}
