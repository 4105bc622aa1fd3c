//! Albert Heijn receipts for Rust.
//!
//! Polls the Albert Heijn mobile receipts endpoint and exposes four read-only
//! sensors derived from the last fetched page: total spent, total discount,
//! receipt count and the most recent receipt.
//!
//! # Quick start
//!
//! ```no_run
//! use ah_receipts::ReceiptMonitor;
//!
//! let mut monitor = ReceiptMonitor::builder()
//!     .access_token("my-token")
//!     .build()
//!     .unwrap();
//!
//! // Fetches at most once per throttle interval (30 minutes by default)
//! monitor.update();
//!
//! println!("spent: {}", monitor.total_spent().value());
//! println!("last receipt: {:?}", monitor.last_receipt().value());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod sensors;
pub mod throttle;

#[cfg(feature = "async")]
pub use async_client::AsyncReceiptMonitor;
pub use client::ReceiptClient;
pub use config::Settings;
pub use error::{ReceiptError, Result};
pub use models::{Receipt, ReceiptBatch, Snapshot};
pub use sensors::{Sensor, SensorReading, SensorValue};
pub use throttle::Throttle;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, error, info};

use sensors::{LastReceiptSensor, ReceiptCountSensor, TotalDiscountSensor, TotalSpentSensor};

// ---------------------------------------------------------------------------
// ReceiptMonitorBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ReceiptMonitor`].
///
/// Use [`ReceiptMonitor::builder()`] to obtain one. Only the access token is
/// required.
pub struct ReceiptMonitorBuilder {
    access_token: Option<String>,
    base_url: String,
    page_size: u32,
    timeout: Duration,
    min_time_between_updates: Duration,
    keep_snapshot_on_error: bool,
}

impl Default for ReceiptMonitorBuilder {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: config::DEFAULT_BASE_URL.to_string(),
            page_size: config::DEFAULT_PAGE_SIZE,
            timeout: config::DEFAULT_TIMEOUT,
            min_time_between_updates: config::MIN_TIME_BETWEEN_UPDATES,
            keep_snapshot_on_error: true,
        }
    }
}

impl ReceiptMonitorBuilder {
    /// Set the bearer token sent with every request.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Override the mobile services base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Number of receipts requested per fetch. Defaults to 50.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set the HTTP request timeout. Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Minimum time between two real fetches. Defaults to 30 minutes.
    pub fn min_time_between_updates(mut self, interval: Duration) -> Self {
        self.min_time_between_updates = interval;
        self
    }

    /// Whether a failed fetch keeps the previous snapshot (the default) or
    /// drops it so every sensor falls back to its empty state.
    pub fn keep_snapshot_on_error(mut self, keep: bool) -> Self {
        self.keep_snapshot_on_error = keep;
        self
    }

    /// Build the monitor.
    ///
    /// Fails with [`ReceiptError::MissingAccessToken`] if no non-empty token
    /// was given. No request is made until the first update.
    pub fn build(self) -> Result<ReceiptMonitor> {
        let Some(token) = self.access_token.filter(|t| !t.trim().is_empty()) else {
            error!("Access token not provided");
            return Err(ReceiptError::MissingAccessToken);
        };
        if self.page_size == 0 {
            return Err(ReceiptError::InvalidArgument(
                "page size must be at least 1".to_string(),
            ));
        }
        let client = ReceiptClient::new(token, self.base_url, self.timeout)?;
        Ok(ReceiptMonitor {
            client,
            throttle: Throttle::new(self.min_time_between_updates),
            page_size: self.page_size,
            keep_snapshot_on_error: self.keep_snapshot_on_error,
            snapshot: None,
        })
    }
}

// ---------------------------------------------------------------------------
// ReceiptMonitor
// ---------------------------------------------------------------------------

/// What an update call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot replaced the previous one.
    Fetched,
    /// The fetch failed; see the log for the cause.
    Failed,
    /// Skipped because the throttle interval has not elapsed.
    Throttled,
}

/// Owns the receipt client and the last fetched snapshot.
///
/// Sensors are lightweight borrowing views over the snapshot, created on
/// demand via [`total_spent()`](Self::total_spent) and friends.
pub struct ReceiptMonitor {
    client: ReceiptClient,
    throttle: Throttle,
    page_size: u32,
    keep_snapshot_on_error: bool,
    snapshot: Option<Arc<Snapshot>>,
}

impl ReceiptMonitor {
    /// Create a new builder for configuring the monitor.
    pub fn builder() -> ReceiptMonitorBuilder {
        ReceiptMonitorBuilder::default()
    }

    /// Build a monitor from loaded [`Settings`].
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut builder = Self::builder()
            .base_url(settings.base_url.clone())
            .page_size(settings.page_size)
            .timeout(settings.timeout())
            .min_time_between_updates(settings.min_time_between_updates())
            .keep_snapshot_on_error(settings.keep_snapshot_on_error);
        if let Some(token) = &settings.access_token {
            builder = builder.access_token(token.clone());
        }
        builder.build()
    }

    // -- Refresh -------------------------------------------------------------

    /// Fetch a fresh snapshot unless the throttle interval is still running.
    pub fn update(&mut self) -> RefreshOutcome {
        let now = Instant::now();
        if !self.throttle.try_acquire_at(now) {
            debug!(
                remaining_secs = self.throttle.remaining_at(now).as_secs(),
                "update throttled"
            );
            return RefreshOutcome::Throttled;
        }
        self.refresh()
    }

    /// Fetch a fresh snapshot now, ignoring and restarting the throttle.
    pub fn force_update(&mut self) -> RefreshOutcome {
        info!("forcing receipts update");
        self.throttle.mark_at(Instant::now());
        self.refresh()
    }

    fn refresh(&mut self) -> RefreshOutcome {
        match self.client.fetch_receipts(self.page_size) {
            Some(body) => {
                let snapshot = Snapshot::from_value(body);
                debug!(receipts = snapshot.batch().len(), "receipts snapshot replaced");
                self.snapshot = Some(Arc::new(snapshot));
                RefreshOutcome::Fetched
            }
            None => {
                if !self.keep_snapshot_on_error {
                    self.snapshot = None;
                }
                RefreshOutcome::Failed
            }
        }
    }

    // -- Snapshot ------------------------------------------------------------

    /// The last fetched snapshot, if any fetch has succeeded.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_deref()
    }

    /// A shared handle to the last snapshot that outlives later updates.
    pub fn shared_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.clone()
    }

    // -- Sensors -------------------------------------------------------------

    /// Total spent across the last snapshot.
    pub fn total_spent(&self) -> TotalSpentSensor<'_> {
        TotalSpentSensor::new(self.snapshot())
    }

    /// Total discount across the last snapshot.
    pub fn total_discount(&self) -> TotalDiscountSensor<'_> {
        TotalDiscountSensor::new(self.snapshot())
    }

    /// Number of receipts in the last snapshot.
    pub fn receipt_count(&self) -> ReceiptCountSensor<'_> {
        ReceiptCountSensor::new(self.snapshot())
    }

    /// Date and store details of the most recent receipt.
    pub fn last_receipt(&self) -> LastReceiptSensor<'_> {
        LastReceiptSensor::new(self.snapshot())
    }

    /// All four sensors, in a fixed order.
    pub fn sensors(&self) -> Vec<Box<dyn Sensor + '_>> {
        let sensors: [Box<dyn Sensor + '_>; 4] = [
            Box::new(self.total_spent()),
            Box::new(self.total_discount()),
            Box::new(self.receipt_count()),
            Box::new(self.last_receipt()),
        ];
        Vec::from(sensors)
    }

    /// Current readings of all four sensors.
    pub fn readings(&self) -> Vec<SensorReading> {
        self.sensors().iter().map(|s| s.reading()).collect()
    }

    // -- Misc ----------------------------------------------------------------

    /// Fetch a single receipt's details. Not throttled.
    pub fn receipt_details(&mut self, receipt_id: &str) -> Option<Value> {
        self.client.fetch_receipt_details(receipt_id)
    }

    /// Number of receipts requested per fetch.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The guard deciding when `update()` may fetch.
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// The underlying receipts client.
    pub fn client(&self) -> &ReceiptClient {
        &self.client
    }

    /// Consume the monitor and release the HTTP client.
    pub fn close(mut self) {
        self.client.close();
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ReceiptMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.snapshot() {
            Some(snapshot) => write!(
                f,
                "ReceiptMonitor(endpoint={}, page_size={}, receipts={}, last_update={})",
                self.client.receipts_url(),
                self.page_size,
                snapshot.batch().len(),
                snapshot.fetched_at().to_rfc3339()
            ),
            None => write!(
                f,
                "ReceiptMonitor(endpoint={}, page_size={}, receipts=none)",
                self.client.receipts_url(),
                self.page_size
            ),
        }
    }
}
