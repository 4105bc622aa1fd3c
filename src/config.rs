//! Endpoint constants and operator settings.
//!
//! Settings come from an optional JSON file (by default
//! `<config dir>/ah-receipts/config.json`) with `AH_*` environment variables
//! layered on top.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ReceiptError, Result};

pub const DEFAULT_BASE_URL: &str = "https://ms.ah.nl:8080/mobile-services";
pub const RECEIPTS_PATH: &str = "/receipts/v1/receipts";
pub const USER_AGENT: &str = "AH/5.2.1 (Android 10)";

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const MIN_TIME_BETWEEN_UPDATES: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Environment variable holding the bearer token.
pub const ENV_ACCESS_TOKEN: &str = "AH_ACCESS_TOKEN";

/// Operator-facing configuration for a [`ReceiptMonitor`](crate::ReceiptMonitor).
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change. The access token has no usable default: building a monitor
/// without one fails with [`ReceiptError::MissingAccessToken`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub access_token: Option<String>,
    pub base_url: String,
    pub page_size: u32,
    pub timeout_secs: u64,
    pub min_time_between_updates_secs: u64,
    pub scan_interval_secs: u64,
    pub keep_snapshot_on_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            min_time_between_updates_secs: MIN_TIME_BETWEEN_UPDATES.as_secs(),
            scan_interval_secs: DEFAULT_SCAN_INTERVAL.as_secs(),
            keep_snapshot_on_error: true,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    /// Resolve settings the way the CLI does.
    ///
    /// Uses `path` when given, otherwise the default config file if it
    /// exists, otherwise built-in defaults. Environment overrides are applied
    /// last in every case.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_env()?;
        Ok(settings)
    }

    /// Override fields from `AH_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Override fields from an arbitrary key lookup.
    ///
    /// Keys are the environment variable names (`AH_ACCESS_TOKEN`,
    /// `AH_BASE_URL`, `AH_PAGE_SIZE`, `AH_TIMEOUT_SECS`,
    /// `AH_MIN_TIME_BETWEEN_UPDATES_SECS`, `AH_SCAN_INTERVAL_SECS`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_ACCESS_TOKEN) {
            self.access_token = Some(val);
        }
        if let Some(val) = lookup("AH_BASE_URL") {
            self.base_url = val;
        }
        if let Some(val) = parse_override(&lookup, "AH_PAGE_SIZE")? {
            self.page_size = val;
        }
        if let Some(val) = parse_override(&lookup, "AH_TIMEOUT_SECS")? {
            self.timeout_secs = val;
        }
        if let Some(val) = parse_override(&lookup, "AH_MIN_TIME_BETWEEN_UPDATES_SECS")? {
            self.min_time_between_updates_secs = val;
        }
        if let Some(val) = parse_override(&lookup, "AH_SCAN_INTERVAL_SECS")? {
            self.scan_interval_secs = val;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn min_time_between_updates(&self) -> Duration {
        Duration::from_secs(self.min_time_between_updates_secs)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ReceiptError::Config(format!("invalid value for {}: {:?}", key, val))),
        None => Ok(None),
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        dir.join("ah-receipts").join("config.json")
    } else {
        PathBuf::from(".ah-receipts.json")
    }
}
