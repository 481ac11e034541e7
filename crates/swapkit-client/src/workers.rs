//! Clients for the auxiliary worker endpoints.
//!
//! Watermark removal and transcript extraction are opaque single-POST
//! services: one attempt, no fallback routing, body `{url}`. They are
//! external collaborators, not part of the resilient core.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use swapkit_core::models::WorkerReply;
use swapkit_core::{SwapError, WorkerConfig};

const WORKER_TIMEOUT_SECS: u64 = 60;

pub struct WorkerClient {
    http: Client,
    config: WorkerConfig,
}

impl WorkerClient {
    pub fn new(config: WorkerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(WORKER_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for worker endpoints")?;
        Ok(Self { http, config })
    }

    /// Submit a video URL for watermark removal; returns the processed URL.
    pub async fn remove_watermark(&self, video_url: &str) -> Result<String, SwapError> {
        let reply = self
            .post_url(&self.config.watermark_url, video_url)
            .await
            .map_err(|e| SwapError::WorkerFailed(format!("watermark worker: {}", e)))?;

        let reply: WorkerReply = serde_json::from_str(&reply)
            .map_err(|e| SwapError::InvalidResponse(format!("watermark reply: {}", e)))?;
        if reply.code != 200 {
            return Err(SwapError::WorkerFailed(
                reply
                    .message
                    .unwrap_or_else(|| "failed to process the video".to_string()),
            ));
        }

        reply
            .data
            .as_ref()
            .and_then(|d| d.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                SwapError::InvalidResponse("watermark reply missing result URL".to_string())
            })
    }

    /// Fetch a YouTube transcript as plain text.
    ///
    /// The endpoint replies either with a bare array of `{text}` segments
    /// (joined with spaces) or with the `{code, data}` worker shape.
    pub async fn youtube_transcript(&self, youtube_url: &str) -> Result<String, SwapError> {
        let body = self
            .post_url(&self.config.transcript_url, youtube_url)
            .await
            .map_err(|e| SwapError::WorkerFailed(format!("transcript worker: {}", e)))?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| SwapError::InvalidResponse(format!("transcript reply: {}", e)))?;

        if let Some(segments) = value.as_array() {
            let text: Vec<&str> = segments
                .iter()
                .filter_map(|s| s.get("text").and_then(|t| t.as_str()))
                .collect();
            return Ok(text.join(" "));
        }

        value
            .get("data")
            .and_then(|d| d.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| SwapError::WorkerFailed("no transcript content found".to_string()))
    }

    async fn post_url(&self, endpoint: &str, url: &str) -> Result<String> {
        let response = self
            .http
            .post(endpoint)
            .json(&serde_json::json!({ "url": url.trim() }))
            .send()
            .await
            .context("worker did not respond")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("worker returned HTTP {}", status);
        }

        response.text().await.context("failed to read worker reply")
    }
}
