use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resource type tag the processing service expects for face images.
pub const IMAGE_RESOURCE_TYPE: u8 = 1;

/// A selected local file: metadata plus its bytes, read exactly once.
///
/// Owned by the session slot that selected it; replacing the selection or
/// resetting the session drops the handle and releases the buffer.
#[derive(Clone, Debug)]
pub struct FileHandle {
    pub path: PathBuf,
    pub file_name: String,
    /// Declared MIME type; `None` falls back to `image/jpeg`.
    pub mime_type: Option<String>,
    pub len: u64,
    pub bytes: Bytes,
}

impl FileHandle {
    /// File extension including the leading dot, lowercased.
    /// Files without an extension default to `.jpg`.
    pub fn extension(&self) -> String {
        match self.file_name.rfind('.') {
            Some(idx) if idx + 1 < self.file_name.len() => {
                self.file_name[idx..].to_lowercase()
            }
            _ => ".jpg".to_string(),
        }
    }

    pub fn mime_or_default(&self) -> &str {
        self.mime_type.as_deref().unwrap_or("image/jpeg")
    }
}

/// Guess a declared MIME type from a file extension (with leading dot).
/// Unknown extensions return `None`; callers fall back to the default.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.trim_start_matches('.').to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Registration request body for `resource/upload`.
#[derive(Debug, Serialize)]
pub struct RegisterResourceRequest {
    pub ext: String,
    pub md5_key: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub resource_type: u8,
}

/// Server reply to registration: the resource id, an optional single-use
/// write locator, and the registration status.
///
/// Only `no` outlives the upload call. The locator must not be retried once
/// consumed successfully.
#[derive(Clone, Debug, Deserialize)]
pub struct ResourceDescriptor {
    pub no: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ResourceDescriptor {
    /// The server already holds content with this hash; binary put and
    /// confirm are skipped.
    pub fn is_already_complete(&self) -> bool {
        matches!(self.status.as_deref(), Some("success"))
    }
}

/// Ephemeral state for one upload call chain. Never persisted.
#[derive(Clone, Debug)]
pub struct UploadSession {
    pub content_hash: String,
    pub declared_size: u64,
    pub mime_type: String,
    pub descriptor: ResourceDescriptor,
}
