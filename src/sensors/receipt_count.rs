use super::{Attributes, Sensor, SensorDescriptor, SensorValue};
use crate::models::Snapshot;

pub static DESCRIPTOR: SensorDescriptor = SensorDescriptor {
    name: "AH Receipt Count",
    unique_id: "ah_receipt_count",
    device_class: None,
    unit_of_measurement: None,
    icon: "mdi:receipt",
};

/// Number of receipts in the last snapshot.
pub struct ReceiptCountSensor<'a> {
    snapshot: Option<&'a Snapshot>,
}

impl<'a> ReceiptCountSensor<'a> {
    pub fn new(snapshot: Option<&'a Snapshot>) -> Self {
        Self { snapshot }
    }

    pub fn value(&self) -> usize {
        self.snapshot.map(|s| s.batch().len()).unwrap_or(0)
    }
}

impl Sensor for ReceiptCountSensor<'_> {
    fn descriptor(&self) -> &'static SensorDescriptor {
        &DESCRIPTOR
    }

    fn state(&self) -> SensorValue {
        SensorValue::Count(self.value() as u64)
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
    }
}
