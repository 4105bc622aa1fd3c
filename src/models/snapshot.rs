use chrono::{DateTime, Local};
use serde_json::Value;

use super::receipt::{Receipt, ReceiptBatch};

// ---------------------------------------------------------------------------
// Snapshot — The last successfully fetched response
// ---------------------------------------------------------------------------

/// One fetched receipts page, kept whole.
///
/// Holds the body exactly as the endpoint returned it alongside the typed
/// [`ReceiptBatch`] parsed from it, so sensors never re-walk the JSON.
#[derive(Debug, Clone)]
pub struct Snapshot {
    raw: Value,
    batch: ReceiptBatch,
    fetched_at: DateTime<Local>,
}

impl Snapshot {
    pub fn new(raw: Value, fetched_at: DateTime<Local>) -> Self {
        let batch = ReceiptBatch::from_value(&raw);
        Self {
            raw,
            batch,
            fetched_at,
        }
    }

    /// Build a snapshot stamped with the current local time.
    pub fn from_value(raw: Value) -> Self {
        Self::new(raw, Local::now())
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn batch(&self) -> &ReceiptBatch {
        &self.batch
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.batch.receipts
    }

    pub fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }
}
