//! Read-only sensors derived from the last receipts snapshot.
//!
//! Each sensor is a lightweight struct borrowing an optional
//! [`Snapshot`](crate::models::Snapshot) from the
//! [`ReceiptMonitor`](crate::ReceiptMonitor). `None` means no fetch has
//! succeeded yet, and every sensor reports its empty-state default for it.
//! The folds behind each value are also exposed as free functions over a
//! [`ReceiptBatch`](crate::models::ReceiptBatch).

pub mod last_receipt;
pub mod receipt_count;
pub mod total_discount;
pub mod total_spent;

pub use last_receipt::LastReceiptSensor;
pub use receipt_count::ReceiptCountSensor;
pub use total_discount::TotalDiscountSensor;
pub use total_spent::TotalSpentSensor;

use serde::Serialize;
use serde_json::Value;

use crate::models::Snapshot;

/// Extra key/value pairs shown next to a sensor's state.
pub type Attributes = serde_json::Map<String, Value>;

/// Placeholder for receipt text fields the endpoint left out.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// SensorDescriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Monetary,
}

/// Static identity of a sensor: display name, stable id and presentation hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorDescriptor {
    pub name: &'static str,
    pub unique_id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<&'static str>,
    pub icon: &'static str,
}

// ---------------------------------------------------------------------------
// SensorValue / SensorReading
// ---------------------------------------------------------------------------

/// The state of a sensor. `Unknown` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Amount(f64),
    Count(u64),
    Text(String),
    Unknown,
}

impl SensorValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SensorValue::Amount(v) => Some(*v),
            SensorValue::Count(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SensorValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Descriptor, state and attributes of one sensor at one moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    #[serde(flatten)]
    pub descriptor: SensorDescriptor,
    pub state: SensorValue,
    pub attributes: Attributes,
}

// ---------------------------------------------------------------------------
// Sensor
// ---------------------------------------------------------------------------

/// Common surface of the four receipt sensors, for hosts that render them
/// uniformly.
pub trait Sensor {
    fn descriptor(&self) -> &'static SensorDescriptor;

    fn state(&self) -> SensorValue;

    fn attributes(&self) -> Attributes;

    fn reading(&self) -> SensorReading {
        SensorReading {
            descriptor: *self.descriptor(),
            state: self.state(),
            attributes: self.attributes(),
        }
    }
}

/// RFC 3339 timestamp of when `snapshot` was fetched.
fn last_update(snapshot: &Snapshot) -> Value {
    Value::String(snapshot.fetched_at().to_rfc3339())
}
