//! Authenticated HTTP client for the Albert Heijn receipts endpoint.
//!
//! Every fetch is a single blocking GET. Callers pick between the
//! `try_*` methods, which propagate the error, and the plain methods, which
//! log the failure and return `None` so "fetch failed" looks the same as
//! "nothing fetched yet".

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, error};

use crate::config;
use crate::error::{ReceiptError, Result};

/// Fetches receipt pages and receipt details with a bearer token.
pub struct ReceiptClient {
    /// Base URL of the mobile services API, without the receipts path.
    pub base_url: String,
    access_token: String,
    timeout: Duration,
    client: Option<Client>,
}

impl ReceiptClient {
    /// Create a client for `base_url`.
    ///
    /// Fails with [`ReceiptError::MissingAccessToken`] when the token is empty.
    /// The underlying HTTP client is not built until the first request.
    pub fn new(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(ReceiptError::MissingAccessToken);
        }
        Ok(Self {
            base_url: base_url.into(),
            access_token,
            timeout,
            client: None,
        })
    }

    /// Lazy HTTP client carrying the auth, user-agent and content-type headers.
    fn client(&mut self) -> Result<&Client> {
        let client = match self.client.take() {
            Some(client) => client,
            None => self.build_client()?,
        };
        Ok(&*self.client.insert(client))
    }

    fn build_client(&self) -> Result<Client> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|e| ReceiptError::InvalidArgument(format!("access token: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(config::USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(client)
    }

    /// Full URL of the receipts listing.
    pub fn receipts_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), config::RECEIPTS_PATH)
    }

    /// Fetch the first page of receipts, propagating any failure.
    ///
    /// Non-2xx statuses and undecodable bodies are errors. The decoded JSON is
    /// returned as-is.
    pub fn try_fetch_receipts(&mut self, limit: u32) -> Result<Value> {
        if limit == 0 {
            return Err(ReceiptError::InvalidArgument(
                "page size must be at least 1".to_string(),
            ));
        }
        let url = self.receipts_url();
        debug!(%url, limit, "fetching receipts");

        let client = self.client()?;
        let resp = client
            .get(&url)
            .query(&[("size", limit), ("page", 0)])
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    /// Fetch the first page of receipts, or `None` on any failure.
    pub fn fetch_receipts(&mut self, limit: u32) -> Option<Value> {
        match self.try_fetch_receipts(limit) {
            Ok(body) => Some(body),
            Err(e) => {
                error!("Error fetching receipts: {}", e);
                None
            }
        }
    }

    /// Fetch a single receipt by id, propagating any failure.
    pub fn try_fetch_receipt_details(&mut self, receipt_id: &str) -> Result<Value> {
        if receipt_id.is_empty() {
            return Err(ReceiptError::InvalidArgument(
                "receipt id must not be empty".to_string(),
            ));
        }
        let mut url = Url::parse(&self.receipts_url()).map_err(|e| {
            ReceiptError::InvalidArgument(format!("invalid base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ReceiptError::InvalidArgument(format!("base URL {} cannot take a path", self.base_url))
            })?
            .push(receipt_id);
        debug!(%url, "fetching receipt details");

        let client = self.client()?;
        let resp = client.get(url).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    /// Fetch a single receipt by id, or `None` on any failure.
    pub fn fetch_receipt_details(&mut self, receipt_id: &str) -> Option<Value> {
        match self.try_fetch_receipt_details(receipt_id) {
            Ok(body) => Some(body),
            Err(e) => {
                error!("Error fetching receipt details for {}: {}", receipt_id, e);
                None
            }
        }
    }

    /// Drop the HTTP client, if open. The next request builds a new one.
    pub fn close(&mut self) {
        self.client = None;
    }
}
