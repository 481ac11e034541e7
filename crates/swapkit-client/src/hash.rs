//! Content hashing for upload deduplication.
//!
//! The processing service keys stored resources on an MD5 fingerprint of the
//! raw bytes. The fingerprint is a dedup key, not an integrity guarantee.
//! Files are read into memory exactly once; the same buffer is later reused
//! for the binary upload.

use bytes::Bytes;
use std::io::ErrorKind;
use std::path::Path;

use swapkit_core::models::{mime_for_extension, FileHandle};
use swapkit_core::SwapError;

/// Read a local file into a [`FileHandle`], buffering its bytes once.
///
/// Access-revoked conditions (permission denied, file gone) are reported
/// with a message telling the user to select the file again; other I/O
/// failures keep the underlying error text.
pub async fn read_file(path: impl AsRef<Path>) -> Result<FileHandle, SwapError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.jpg".to_string());

    let data = tokio::fs::read(path).await.map_err(|e| {
        if matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::NotFound) {
            SwapError::UnreadableFile(format!(
                "access to \"{}\" was lost; select the file again",
                file_name
            ))
        } else {
            SwapError::UnreadableFile(format!("failed to read {}: {}", path.display(), e))
        }
    })?;

    if data.is_empty() {
        return Err(SwapError::UnreadableFile(format!(
            "\"{}\" is empty (0 bytes)",
            file_name
        )));
    }

    let len = data.len() as u64;
    let handle = FileHandle {
        path: path.to_path_buf(),
        file_name: file_name.clone(),
        mime_type: None,
        len,
        bytes: Bytes::from(data),
    };
    let mime_type = mime_for_extension(&handle.extension()).map(|m| m.to_string());

    Ok(FileHandle { mime_type, ..handle })
}

/// MD5 fingerprint of the buffered bytes, lowercase hex.
///
/// Zero bytes are always an error, never a valid hash of empty content.
pub fn content_md5(bytes: &Bytes) -> Result<String, SwapError> {
    if bytes.is_empty() {
        return Err(SwapError::UnreadableFile(
            "file content is empty (0 bytes)".to_string(),
        ));
    }
    Ok(format!("{:x}", md5::compute(bytes)))
}
