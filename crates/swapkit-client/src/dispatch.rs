//! HTTP dispatch seam.
//!
//! All network traffic goes through the [`HttpDispatch`] trait so the router,
//! uploader, and orchestrator can be exercised against scripted doubles. The
//! production implementation is [`HttpConnector`], a thin wrapper over
//! `reqwest` that sends without credentials (cookies are never attached).

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method};
use std::time::Duration;

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure: the exchange never produced a status line
/// (connection refused, DNS failure, abort).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct DispatchError(pub String);

#[async_trait]
pub trait HttpDispatch: Send + Sync {
    /// Send a JSON request and return the reply whatever its status.
    async fn execute_json(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<HttpReply, DispatchError>;

    /// Write raw bytes with a PUT. Used for the single-use storage locator;
    /// never routed through relays.
    async fn put_binary(
        &self,
        url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<HttpReply, DispatchError>;
}

/// Production dispatch over `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpConnector {
    client: Client,
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpDispatch for HttpConnector {
    async fn execute_json(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<HttpReply, DispatchError> {
        let mut request = self.client.request(method, url);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DispatchError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DispatchError(e.to_string()))?;

        Ok(HttpReply { status, body })
    }

    async fn put_binary(
        &self,
        url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<HttpReply, DispatchError> {
        let response = self
            .client
            .put(url)
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| DispatchError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DispatchError(e.to_string()))?;

        Ok(HttpReply { status, body })
    }
}
