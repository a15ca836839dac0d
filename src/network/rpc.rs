// src/network/rpc.rs
//! JSON-RPC 2.0 envelopes and the HTTP transport to the pool

use crate::utils::error::MinerError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Path every pool call is posted to, relative to the pool base URL
pub const RPC_PATH: &str = "jsonrpc";

/// Outgoing JSON-RPC request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    /// Protocol version, always `"2.0"`
    pub jsonrpc: &'static str,
    /// Pool method name
    pub method: String,
    /// Positional parameters
    pub params: Value,
    /// Correlation id, echoed back by the pool
    pub id: u32,
}

impl RpcRequest {
    /// Builds a JSON-RPC 2.0 request
    pub fn new(method: &str, params: Value, id: u32) -> Self {
        RpcRequest {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id,
        }
    }
}

/// Incoming JSON-RPC response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Echoed correlation id
    #[serde(default)]
    pub id: Option<Value>,
    /// Call result
    #[serde(default)]
    pub result: Option<Value>,
    /// Error object, if the pool rejected the call
    #[serde(default)]
    pub error: Option<Value>,
}

/// Delivers JSON-RPC requests to the pool
///
/// Implementations only move bytes; id matching and result extraction
/// happen in the pool client so every transport is validated the same way.
pub trait RpcTransport: Send + Sync {
    /// Posts `request` and returns the decoded response envelope
    fn post(
        &self,
        request: &RpcRequest,
    ) -> impl Future<Output = Result<RpcResponse, MinerError>> + Send;
}

/// JSON-RPC over HTTP POST
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for making RPC requests
    client: Client,
    /// Fully resolved `<base>/jsonrpc` endpoint
    endpoint: Url,
}

impl HttpTransport {
    /// Creates a transport for the pool at `base_url`
    ///
    /// `/jsonrpc` is appended to the base URL, keeping any path it already
    /// has.
    ///
    /// # Errors
    /// Returns `MinerError` if the URL is invalid or the HTTP client cannot
    /// be built
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MinerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport {
            client,
            endpoint: rpc_endpoint(base_url)?,
        })
    }

    /// Endpoint requests are posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl RpcTransport for HttpTransport {
    async fn post(&self, request: &RpcRequest) -> Result<RpcResponse, MinerError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MinerError::PoolResponse {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Err(MinerError::ProtocolError(format!(
                "Invalid response when calling '{}': No data present in the response",
                request.method
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Resolves the JSON-RPC endpoint under a pool base URL
///
/// # Errors
/// Returns `MinerError::UrlError` if `base_url` does not parse
pub fn rpc_endpoint(base_url: &str) -> Result<Url, MinerError> {
    let mut base = Url::parse(base_url.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(RPC_PATH)?)
}
