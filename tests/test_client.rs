//! Receipt client tests against a local `wiremock` server.
//!
//! The client is blocking, so it is created, used and dropped inside
//! `spawn_blocking`.

mod common;

use std::time::Duration;

use ah_receipts::{ReceiptClient, ReceiptError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// fetch_receipts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_receipts_sends_auth_and_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(common::RECEIPTS_PATH))
        .and(query_param("size", "50"))
        .and(query_param("page", "0"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("user-agent", "AH/5.2.1 (Android 10)"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::sample_body()))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let body = tokio::task::spawn_blocking(move || common::client_for(&uri).fetch_receipts(50))
        .await
        .unwrap();

    assert_eq!(body, Some(common::sample_body()));
}

#[tokio::test]
async fn fetch_receipts_passes_custom_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(common::RECEIPTS_PATH))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::empty_body()))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let body = tokio::task::spawn_blocking(move || common::client_for(&uri).fetch_receipts(10))
        .await
        .unwrap();

    assert_eq!(body.unwrap()["receipts"], json!([]));
}

#[tokio::test]
async fn fetch_receipts_returns_body_without_validation() {
    let server = MockServer::start().await;
    let odd = json!({"unexpected": true, "items": [1, 2, 3]});
    common::mount_receipts(&server, odd.clone()).await;

    let uri = server.uri();
    let body = tokio::task::spawn_blocking(move || common::client_for(&uri).fetch_receipts(50))
        .await
        .unwrap();

    assert_eq!(body, Some(odd));
}

#[tokio::test]
async fn server_error_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(common::RECEIPTS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (body, err) = tokio::task::spawn_blocking(move || {
        let mut client = common::client_for(&uri);
        (client.fetch_receipts(50), client.try_fetch_receipts(50))
    })
    .await
    .unwrap();

    assert!(body.is_none());
    assert!(matches!(err, Err(ReceiptError::Http(_))));
}

#[tokio::test]
async fn unauthorized_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(common::RECEIPTS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let body = tokio::task::spawn_blocking(move || common::client_for(&uri).fetch_receipts(50))
        .await
        .unwrap();

    assert!(body.is_none());
}

#[tokio::test]
async fn undecodable_body_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(common::RECEIPTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let body = tokio::task::spawn_blocking(move || common::client_for(&uri).fetch_receipts(50))
        .await
        .unwrap();

    assert!(body.is_none());
}

#[tokio::test]
async fn timeout_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(common::RECEIPTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::sample_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let body = tokio::task::spawn_blocking(move || {
        let mut client =
            ReceiptClient::new(common::TOKEN, uri, Duration::from_millis(200)).unwrap();
        client.fetch_receipts(50)
    })
    .await
    .unwrap();

    assert!(body.is_none());
}

#[test]
fn connection_refused_is_no_data() {
    let mut client = ReceiptClient::new(
        common::TOKEN,
        "http://127.0.0.1:1",
        Duration::from_secs(2),
    )
    .unwrap();
    assert!(client.fetch_receipts(50).is_none());
}

// ---------------------------------------------------------------------------
// fetch_receipt_details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_receipt_details_hits_receipt_path() {
    let server = MockServer::start().await;
    let detail = json!({"receiptNumber": "R-0003", "receiptLines": []});
    Mock::given(method("GET"))
        .and(path(format!("{}/abc-123", common::RECEIPTS_PATH)))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let body = tokio::task::spawn_blocking(move || {
        common::client_for(&uri).fetch_receipt_details("abc-123")
    })
    .await
    .unwrap();

    assert_eq!(body, Some(detail));
}

#[tokio::test]
async fn missing_receipt_details_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let uri = server.uri();
    let body = tokio::task::spawn_blocking(move || {
        common::client_for(&uri).fetch_receipt_details("does-not-exist")
    })
    .await
    .unwrap();

    assert!(body.is_none());
}

// ---------------------------------------------------------------------------
// Argument validation
// ---------------------------------------------------------------------------

#[test]
fn empty_token_is_rejected() {
    let result = ReceiptClient::new("  ", "http://localhost", Duration::from_secs(1));
    assert!(matches!(result, Err(ReceiptError::MissingAccessToken)));
}

#[test]
fn zero_page_size_is_rejected() {
    let mut client = common::client_for("http://localhost");
    assert!(matches!(
        client.try_fetch_receipts(0),
        Err(ReceiptError::InvalidArgument(_))
    ));
}

#[test]
fn empty_receipt_id_is_rejected() {
    let mut client = common::client_for("http://localhost");
    assert!(matches!(
        client.try_fetch_receipt_details(""),
        Err(ReceiptError::InvalidArgument(_))
    ));
}

#[test]
fn receipts_url_ignores_trailing_slash() {
    let client = common::client_for("https://example.test/mobile-services/");
    assert_eq!(
        client.receipts_url(),
        "https://example.test/mobile-services/receipts/v1/receipts"
    );
}
