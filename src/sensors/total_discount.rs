//! Total discount received, with the discount share of spending.

use serde_json::Value;

use super::total_spent::total_spent;
use super::{last_update, Attributes, DeviceClass, Sensor, SensorDescriptor, SensorValue};
use crate::models::{cents_to_units, round_to, sum_cents, Receipt, ReceiptBatch, Snapshot};

pub static DESCRIPTOR: SensorDescriptor = SensorDescriptor {
    name: "AH Total Discount",
    unique_id: "ah_total_discount",
    device_class: Some(DeviceClass::Monetary),
    unit_of_measurement: Some("EUR"),
    icon: "mdi:percent",
};

/// Discount over a batch, in euros rounded to two decimals.
///
/// Per receipt: `discountTotal`, falling back to `bonusTotal`, plus the
/// `discount` of every receipt line.
pub fn total_discount(batch: &ReceiptBatch) -> f64 {
    cents_to_units(sum_cents(batch.receipts.iter().map(Receipt::discount_cents)))
}

/// `discount / spent` as a percentage with one decimal, e.g. `"25.0%"`.
///
/// Returns `"0%"` when nothing was spent.
pub fn discount_percentage(discount: f64, spent: f64) -> String {
    if spent > 0.0 {
        format!("{:.1}%", round_to(discount / spent * 100.0, 1))
    } else {
        "0%".to_string()
    }
}

/// Discount received over the snapshot, in euros.
pub struct TotalDiscountSensor<'a> {
    snapshot: Option<&'a Snapshot>,
}

impl<'a> TotalDiscountSensor<'a> {
    pub fn new(snapshot: Option<&'a Snapshot>) -> Self {
        Self { snapshot }
    }

    /// Total discount in euros; `0.0` without a snapshot.
    pub fn value(&self) -> f64 {
        self.snapshot
            .map(|s| total_discount(s.batch()))
            .unwrap_or(0.0)
    }
}

impl Sensor for TotalDiscountSensor<'_> {
    fn descriptor(&self) -> &'static SensorDescriptor {
        &DESCRIPTOR
    }

    fn state(&self) -> SensorValue {
        SensorValue::Amount(self.value())
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        if let Some(snapshot) = self.snapshot {
            let spent = total_spent(snapshot.batch());
            attrs.insert(
                "discount_percentage".into(),
                Value::String(discount_percentage(self.value(), spent)),
            );
            attrs.insert("total_spent".into(), Value::from(spent));
            attrs.insert("last_update".into(), last_update(snapshot));
        }
        attrs
    }
}
