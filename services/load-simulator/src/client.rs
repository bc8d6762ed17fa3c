//! HTTP client adapter for the order API
//!
//! The scenario runner only sees the [`OrderApi`] trait, so tests can swap the
//! real reqwest-backed adapter for an in-process fake.

use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

/// Fixed per-request timeout used for both order and reprocess calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Status and parsed body of an order API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// JSON body, or `Value::Null` when the body was empty or not JSON.
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two calls a scenario makes against the target API.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// `POST {base}/orders`
    async fn create_order(&self) -> Result<ApiResponse, ClientError>;

    /// `POST {base}/orders/{order_id}/reprocess`
    async fn reprocess(&self, order_id: &str) -> Result<ApiResponse, ClientError>;
}

/// reqwest-backed [`OrderApi`] with a fixed request timeout.
#[derive(Debug, Clone)]
pub struct HttpOrderApi {
    client: Client,
    base_url: Url,
}

impl HttpOrderApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let invalid = |message: String| ClientError::InvalidUrl {
            url: base_url.to_string(),
            message,
        };

        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }

        // The target is the service itself or a sibling on the same network.
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post(&self, url: Url) -> Result<ApiResponse, ClientError> {
        let response = self
            .client
            .post(url.clone())
            .send()
            .await
            .map_err(|e| classify(&url, e))?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| classify(&url, e))?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn create_order(&self) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint(&["orders"])?;
        self.post(url).await
    }

    async fn reprocess(&self, order_id: &str) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint(&["orders", order_id, "reprocess"])?;
        self.post(url).await
    }
}

fn classify(url: &Url, err: reqwest::Error) -> ClientError {
    let url = url.to_string();
    if err.is_timeout() {
        ClientError::Timeout { url }
    } else if err.is_connect() {
        ClientError::Connect {
            url,
            message: err.to_string(),
        }
    } else {
        ClientError::Transport {
            url,
            message: err.to_string(),
        }
    }
}
