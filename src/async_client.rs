//! Async wrapper around [`ReceiptMonitor`] for use in async runtimes (Tokio, etc.).
//!
//! The monitor uses a blocking HTTP client, so every operation is sent to
//! Tokio's blocking thread pool via [`tokio::task::spawn_blocking`]. A mutex
//! serializes access, so at most one fetch is in flight.
//!
//! # Example
//!
//! ```no_run
//! use ah_receipts::AsyncReceiptMonitor;
//!
//! #[tokio::main]
//! async fn main() {
//!     let monitor = AsyncReceiptMonitor::builder()
//!         .access_token("my-token")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     monitor.update().await.unwrap();
//!     let spent = monitor.run(|m| Ok(m.total_spent().value())).await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{ReceiptError, Result};
use crate::sensors::SensorReading;
use crate::{ReceiptMonitor, RefreshOutcome};

// ---------------------------------------------------------------------------
// AsyncReceiptMonitorBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncReceiptMonitor`].
#[derive(Default)]
pub struct AsyncReceiptMonitorBuilder {
    access_token: Option<String>,
    base_url: Option<String>,
    page_size: Option<u32>,
    timeout: Option<Duration>,
    min_time_between_updates: Option<Duration>,
    keep_snapshot_on_error: Option<bool>,
}

impl AsyncReceiptMonitorBuilder {
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn min_time_between_updates(mut self, interval: Duration) -> Self {
        self.min_time_between_updates = Some(interval);
        self
    }

    /// See [`ReceiptMonitorBuilder::keep_snapshot_on_error`](crate::ReceiptMonitorBuilder::keep_snapshot_on_error).
    pub fn keep_snapshot_on_error(mut self, keep: bool) -> Self {
        self.keep_snapshot_on_error = Some(keep);
        self
    }

    /// Build the monitor on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncReceiptMonitor> {
        tokio::task::spawn_blocking(move || {
            let mut builder = ReceiptMonitor::builder();
            if let Some(token) = self.access_token {
                builder = builder.access_token(token);
            }
            if let Some(url) = self.base_url {
                builder = builder.base_url(url);
            }
            if let Some(size) = self.page_size {
                builder = builder.page_size(size);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(interval) = self.min_time_between_updates {
                builder = builder.min_time_between_updates(interval);
            }
            if let Some(keep) = self.keep_snapshot_on_error {
                builder = builder.keep_snapshot_on_error(keep);
            }
            let monitor = builder.build()?;
            Ok(AsyncReceiptMonitor {
                inner: Arc::new(Mutex::new(monitor)),
            })
        })
        .await
        .map_err(|e| ReceiptError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncReceiptMonitor
// ---------------------------------------------------------------------------

/// Async wrapper around [`ReceiptMonitor`].
///
/// Cloning is cheap and every clone drives the same monitor.
#[derive(Clone)]
pub struct AsyncReceiptMonitor {
    inner: Arc<Mutex<ReceiptMonitor>>,
}

impl AsyncReceiptMonitor {
    pub fn builder() -> AsyncReceiptMonitorBuilder {
        AsyncReceiptMonitorBuilder::default()
    }

    /// Run a monitor operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ReceiptMonitor) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let monitor = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = monitor
                .lock()
                .map_err(|_| ReceiptError::InvalidArgument("monitor lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| ReceiptError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Throttled update, see [`ReceiptMonitor::update`].
    pub async fn update(&self) -> Result<RefreshOutcome> {
        self.run(|m| Ok(m.update())).await
    }

    /// Unthrottled update, see [`ReceiptMonitor::force_update`].
    pub async fn force_update(&self) -> Result<RefreshOutcome> {
        self.run(|m| Ok(m.force_update())).await
    }

    /// Current readings of all four sensors.
    pub async fn readings(&self) -> Result<Vec<SensorReading>> {
        self.run(|m| Ok(m.readings())).await
    }
}
