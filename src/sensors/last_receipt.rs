//! Date and store details of the most recent receipt.
//!
//! "Most recent" is the first receipt in the order the endpoint returned
//! them. The endpoint lists newest first; nothing here re-sorts.

use serde_json::Value;

use super::{last_update, Attributes, Sensor, SensorDescriptor, SensorValue, UNKNOWN};
use crate::models::{cents_to_units, Receipt, Snapshot};

pub static DESCRIPTOR: SensorDescriptor = SensorDescriptor {
    name: "AH Last Receipt",
    unique_id: "ah_last_receipt",
    device_class: None,
    unit_of_measurement: None,
    icon: "mdi:receipt-text",
};

/// `transactionDate` of the first receipt, with its store details as attributes.
pub struct LastReceiptSensor<'a> {
    snapshot: Option<&'a Snapshot>,
}

impl<'a> LastReceiptSensor<'a> {
    pub fn new(snapshot: Option<&'a Snapshot>) -> Self {
        Self { snapshot }
    }

    /// The first receipt of the snapshot, if any.
    pub fn receipt(&self) -> Option<&'a Receipt> {
        self.snapshot.and_then(|s| s.batch().latest())
    }

    /// `transactionDate` of the first receipt.
    pub fn value(&self) -> Option<&'a str> {
        self.receipt().and_then(|r| r.transaction_date.as_deref())
    }
}

fn text_or_unknown(field: &Option<String>) -> Value {
    Value::String(field.as_deref().unwrap_or(UNKNOWN).to_string())
}

impl Sensor for LastReceiptSensor<'_> {
    fn descriptor(&self) -> &'static SensorDescriptor {
        &DESCRIPTOR
    }

    fn state(&self) -> SensorValue {
        match self.value() {
            Some(date) => SensorValue::Text(date.to_string()),
            None => SensorValue::Unknown,
        }
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        let (Some(snapshot), Some(receipt)) = (self.snapshot, self.receipt()) else {
            return attrs;
        };
        attrs.insert("store_name".into(), text_or_unknown(&receipt.store_name));
        attrs.insert("store_address".into(), text_or_unknown(&receipt.store_address));
        attrs.insert(
            "total_amount".into(),
            Value::from(cents_to_units(receipt.grand_total_cents())),
        );
        attrs.insert("receipt_number".into(), text_or_unknown(&receipt.receipt_number));
        attrs.insert("last_update".into(), last_update(snapshot));
        attrs
    }
}
