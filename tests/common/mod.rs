//! Shared fixtures for the receipts integration tests.
//!
//! Provides sample response bodies shaped like the receipts endpoint, and
//! helpers to point a client or monitor at a `wiremock` server.

#![allow(dead_code)]

use std::time::Duration;

use ah_receipts::{ReceiptClient, ReceiptMonitor};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const RECEIPTS_PATH: &str = "/receipts/v1/receipts";

/// Three receipts, newest first, exercising every discount source.
///
/// - spent: 45.67 + 12.00 + 30.33 = 88.00
/// - discount: 5.00 (discountTotal over bonusTotal) + 2.50 (bonusTotal)
///   + 0.75 + 0.25 (line discounts) = 8.50
pub fn sample_body() -> Value {
    json!({
        "receipts": [
            {
                "transactionDate": "2024-01-05T17:32:00Z",
                "storeName": "AH Amsterdam",
                "storeAddress": "Damrak 1, Amsterdam",
                "receiptNumber": "R-0003",
                "grandTotal": 4567,
                "discountTotal": 500,
                "bonusTotal": 300
            },
            {
                "transactionDate": "2024-01-03T09:10:00Z",
                "storeName": "AH Utrecht",
                "grandTotal": 1200,
                "bonusTotal": 250
            },
            {
                "transactionDate": "2024-01-01T12:00:00Z",
                "grandTotal": 3033,
                "receiptLines": [
                    {"description": "Melk", "discount": 75},
                    {"description": "Brood"},
                    {"description": "Kaas", "discount": 25}
                ]
            }
        ],
        "page": {"size": 50, "number": 0, "totalElements": 3}
    })
}

pub fn empty_body() -> Value {
    json!({"receipts": [], "page": {"size": 50, "number": 0, "totalElements": 0}})
}

/// Respond to every receipts listing request with `body`.
pub async fn mount_receipts(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(RECEIPTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// A client for `base_url` with a short timeout.
pub fn client_for(base_url: &str) -> ReceiptClient {
    ReceiptClient::new(TOKEN, base_url, Duration::from_secs(5)).unwrap()
}

/// A monitor for `base_url` with the default 30-minute throttle.
pub fn monitor_for(base_url: &str) -> ReceiptMonitor {
    ReceiptMonitor::builder()
        .access_token(TOKEN)
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// A monitor for `base_url` whose throttle never blocks.
pub fn unthrottled_monitor_for(base_url: &str) -> ReceiptMonitor {
    ReceiptMonitor::builder()
        .access_token(TOKEN)
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .min_time_between_updates(Duration::ZERO)
        .build()
        .unwrap()
}
