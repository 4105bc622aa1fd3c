use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// ReceiptBatch — One page of the receipts endpoint
// ---------------------------------------------------------------------------

/// The typed view of a receipts response.
///
/// Only the `receipts` list is modelled; pagination metadata stays in the raw
/// JSON held by [`Snapshot`](super::Snapshot). Parsing never fails: a body
/// that is not an object, or has no usable `receipts` array, is an empty
/// batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptBatch {
    #[serde(default, deserialize_with = "lenient_list")]
    pub receipts: Vec<Receipt>,
}

impl ReceiptBatch {
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// The first receipt in upstream order.
    ///
    /// The endpoint is expected to list the most recent purchase first; that
    /// ordering is not checked here.
    pub fn latest(&self) -> Option<&Receipt> {
        self.receipts.first()
    }
}

// ---------------------------------------------------------------------------
// Receipt — A single purchase
// ---------------------------------------------------------------------------

/// A purchase receipt. Amounts are in cents.
///
/// Fields that are missing or carry an unexpected JSON type deserialize as
/// `None` (or an empty list) instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(default, deserialize_with = "lenient_cents", skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<i64>,
    #[serde(default, deserialize_with = "lenient_cents", skip_serializing_if = "Option::is_none")]
    pub discount_total: Option<i64>,
    #[serde(default, deserialize_with = "lenient_cents", skip_serializing_if = "Option::is_none")]
    pub bonus_total: Option<i64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub receipt_lines: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub store_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
}

impl Receipt {
    pub fn grand_total_cents(&self) -> i64 {
        self.grand_total.unwrap_or(0)
    }

    /// Receipt-level discount plus every line discount, in cents.
    ///
    /// `discountTotal` wins over `bonusTotal`; at most one of them counts.
    pub fn discount_cents(&self) -> i64 {
        let header = self.discount_total.or(self.bonus_total).unwrap_or(0);
        let lines = sum_cents(self.receipt_lines.iter().map(LineItem::discount_cents));
        header.saturating_add(lines)
    }
}

// ---------------------------------------------------------------------------
// LineItem — One line on a receipt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient_cents", skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
}

impl LineItem {
    pub fn discount_cents(&self) -> i64 {
        self.discount.unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Amount helpers
// ---------------------------------------------------------------------------

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Add cent amounts, saturating at the `i64` bounds instead of overflowing.
pub fn sum_cents<I>(amounts: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    amounts.into_iter().fold(0i64, i64::saturating_add)
}

/// Convert cents to currency units, rounded to two decimals.
pub fn cents_to_units(cents: i64) -> f64 {
    round_to(cents as f64 / 100.0, 2)
}

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

fn lenient_cents<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64))))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept any JSON value; only arrays produce items. Elements that do not
/// parse become `T::default()` so the list length matches upstream.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}
