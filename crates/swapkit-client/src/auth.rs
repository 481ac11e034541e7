//! Request headers for the processing service.
//!
//! The service authenticates calls with a fixed per-endpoint-family
//! signature token plus a timestamp, nonce, version tag, and device
//! identifier. The tokens are opaque values from the service contract and
//! are reproduced exactly; no signing is derived from the request.

use chrono::Utc;
use reqwest::Method;

use crate::router::ApiRequest;
use swapkit_core::ProcessorConfig;

/// Endpoint families with distinct signature tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFamily {
    Upload,
    Complete,
    Add,
    Query,
    Other,
}

impl EndpointFamily {
    /// Classify an endpoint path. Later patterns take precedence, matching
    /// the service contract's selection order.
    pub fn from_path(path: &str) -> Self {
        let mut family = EndpointFamily::Other;
        if path.contains("upload") {
            family = EndpointFamily::Upload;
        }
        if path.contains("complete") {
            family = EndpointFamily::Complete;
        }
        if path.contains("add") {
            family = EndpointFamily::Add;
        }
        if path.contains("query") {
            family = EndpointFamily::Query;
        }
        family
    }

    fn signature<'a>(&self, processor: &'a ProcessorConfig) -> &'a str {
        let sigs = &processor.signatures;
        match self {
            EndpointFamily::Upload => &sigs.upload,
            EndpointFamily::Complete => &sigs.complete,
            EndpointFamily::Add => &sigs.add,
            EndpointFamily::Query => &sigs.query,
            EndpointFamily::Other => &sigs.fallback,
        }
    }
}

/// The full header set the service expects on a call to `path`.
pub fn request_headers(processor: &ProcessorConfig, path: &str) -> Vec<(String, String)> {
    let now = Utc::now();
    let timestamp = now.timestamp().to_string();
    let nonce = now.timestamp_millis().to_string();
    let signature = EndpointFamily::from_path(path).signature(processor);

    vec![
        ("Accept".to_string(), "application/json".to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Origin".to_string(), processor.origin.clone()),
        ("Referer".to_string(), processor.referer.clone()),
        ("X-Nonce".to_string(), nonce),
        ("X-Timestamp".to_string(), timestamp),
        ("X-Signature".to_string(), signature.to_string()),
        ("X-Version".to_string(), processor.version_tag.clone()),
        ("X-Device-Id".to_string(), processor.device_id.clone()),
    ]
}

/// Build a routed POST to a processing-service endpoint path
/// (e.g. `resource/upload`).
pub fn processor_request(
    processor: &ProcessorConfig,
    path: &str,
    body: serde_json::Value,
) -> ApiRequest {
    ApiRequest {
        method: Method::POST,
        url: format!("{}/{}", processor.base_url.trim_end_matches('/'), path),
        headers: request_headers(processor, path),
        body: Some(body),
    }
}
