//! HTTP Transport
//!
//! Sends each invocation as a JSON-RPC 2.0 `POST` to the endpoint URL and
//! decodes the reply.
//!
//! # Error mapping
//!
//! - connection failures and non-2xx statuses: [`BizrpcError::Http`]
//! - request timeouts: [`BizrpcError::Timeout`]
//! - bodies that are not JSON-RPC: [`BizrpcError::InvalidResponse`]
//! - JSON-RPC `error` objects: [`BizrpcError::Rpc`]
//!
//! In-band faults inside `result` are returned untouched.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use super::codec::JsonCodec;
use super::{Transport, TransportFactory};
use crate::protocol::error::{BizrpcError, Result};
use crate::protocol::{JsonRpcRequest, RpcArgs};

/// HTTP transport configuration.
///
/// # Default Configuration
///
/// - `timeout_ms`: 30000 (30 seconds)
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpTransportConfig {
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self { timeout_ms: 30000 }
    }
}

/// Builds [`HttpTransport`] handles that share one connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransportFactory {
    client: reqwest::Client,
    config: HttpTransportConfig,
}

impl HttpTransportFactory {
    pub fn new() -> Result<Self> {
        Self::with_config(HttpTransportConfig::default())
    }

    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| BizrpcError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }
}

impl TransportFactory for HttpTransportFactory {
    fn construct(&self, endpoint_url: &str) -> Result<Arc<dyn Transport>> {
        let url = parse_endpoint_url(endpoint_url)?;
        tracing::debug!(url = %url, "constructed HTTP transport");

        Ok(Arc::new(HttpTransport {
            client: self.client.clone(),
            url,
            timeout_ms: self.config.timeout_ms,
        }))
    }
}

/// Validates that an endpoint URL parses and uses http or https.
fn parse_endpoint_url(endpoint_url: &str) -> Result<Url> {
    let url = Url::parse(endpoint_url).map_err(|e| {
        BizrpcError::Configuration(format!("Invalid endpoint URL '{}': {}", endpoint_url, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BizrpcError::Configuration(format!(
            "Invalid endpoint URL '{}': unsupported scheme '{}', expected http or https",
            endpoint_url, other
        ))),
    }
}

/// JSON-RPC over HTTP handle for one endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    timeout_ms: u64,
}

impl HttpTransport {
    fn map_send_error(&self, err: reqwest::Error) -> BizrpcError {
        if err.is_timeout() {
            BizrpcError::Timeout(self.timeout_ms)
        } else {
            BizrpcError::Http(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn invoke(&self, method: &str, args: RpcArgs) -> Result<Value> {
        let request = JsonRpcRequest::call(method, args);
        let body = JsonCodec::encode_request(&request)?;

        tracing::debug!(url = %self.url, method, id = %request.id, "sending JSON-RPC request");

        let response = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?
            .error_for_status()?;

        let bytes = response.bytes().await.map_err(|e| self.map_send_error(e))?;
        JsonCodec::decode_response(&bytes)?.into_result()
    }
}
