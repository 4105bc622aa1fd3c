//! Total amount spent across the fetched receipts.

use serde_json::Value;

use super::{last_update, Attributes, DeviceClass, Sensor, SensorDescriptor, SensorValue};
use crate::models::{cents_to_units, sum_cents, Receipt, ReceiptBatch, Snapshot};

pub static DESCRIPTOR: SensorDescriptor = SensorDescriptor {
    name: "AH Total Spent",
    unique_id: "ah_total_spent",
    device_class: Some(DeviceClass::Monetary),
    unit_of_measurement: Some("EUR"),
    icon: "mdi:currency-eur",
};

/// Sum of `grandTotal` over a batch, in euros rounded to two decimals.
pub fn total_spent(batch: &ReceiptBatch) -> f64 {
    cents_to_units(sum_cents(batch.receipts.iter().map(Receipt::grand_total_cents)))
}

/// Sum of `grandTotal` over the snapshot, in euros.
pub struct TotalSpentSensor<'a> {
    snapshot: Option<&'a Snapshot>,
}

impl<'a> TotalSpentSensor<'a> {
    pub fn new(snapshot: Option<&'a Snapshot>) -> Self {
        Self { snapshot }
    }

    /// Total spent in euros; `0.0` without a snapshot.
    pub fn value(&self) -> f64 {
        self.snapshot
            .map(|s| total_spent(s.batch()))
            .unwrap_or(0.0)
    }
}

impl Sensor for TotalSpentSensor<'_> {
    fn descriptor(&self) -> &'static SensorDescriptor {
        &DESCRIPTOR
    }

    fn state(&self) -> SensorValue {
        SensorValue::Amount(self.value())
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        if let Some(snapshot) = self.snapshot {
            attrs.insert("receipt_count".into(), Value::from(snapshot.batch().len()));
            attrs.insert("last_update".into(), last_update(snapshot));
        }
        attrs
    }
}
