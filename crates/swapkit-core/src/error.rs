//! Error types module
//!
//! All client failures are unified under the `SwapError` enum: file access,
//! transport exhaustion, upload-phase failures, and job-level failures.
//! `ErrorAdvice` lets callers render recovery guidance without matching on
//! individual variants.

/// Metadata for surfacing an error to the user - defines how a failure
/// should be presented and whether the operation is worth retrying.
pub trait ErrorAdvice {
    /// Whether this error is recoverable (the user can retry)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from internal error message)
    fn client_message(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("File could not be read: {0}")]
    UnreadableFile(String),

    #[error("Checksum computation failed: {0}")]
    HashFailed(String),

    #[error("All transport routes exhausted after {attempts} attempts")]
    AllRoutesExhausted { attempts: usize },

    #[error("Resource registration rejected: {0}")]
    RegistrationRejected(String),

    #[error("Binary upload failed: {0}")]
    BinaryPutFailed(String),

    #[error("Upload confirmation failed: {0}")]
    ConfirmationFailed(String),

    #[error("Job submission rejected: {0}")]
    SubmissionRejected(String),

    #[error("Job rejected by server: {0}")]
    JobRejected(String),

    #[error("Job polling timed out after {attempts} polls")]
    JobTimeout { attempts: usize },

    #[error("Worker endpoint failed: {0}")]
    WorkerFailed(String),

    #[error("Invalid response payload: {0}")]
    InvalidResponse(String),
}

/// Static metadata for each variant: (recoverable, suggested_action).
/// client_message stays per-variant for dynamic content.
fn swap_error_static_metadata(err: &SwapError) -> (bool, Option<&'static str>) {
    match err {
        SwapError::UnreadableFile(_) => (true, Some("Select the file again")),
        SwapError::HashFailed(_) => (false, Some("Try a different file")),
        SwapError::AllRoutesExhausted { .. } => (
            true,
            Some("Check your connection or retry over a different network path (VPN)"),
        ),
        SwapError::RegistrationRejected(_) => (true, Some("Retry the upload")),
        SwapError::BinaryPutFailed(_) => (true, Some("Retry the upload")),
        SwapError::ConfirmationFailed(_) => (true, Some("Retry the upload")),
        SwapError::SubmissionRejected(_) => (true, Some("Retry after a short delay")),
        SwapError::JobRejected(_) => (
            false,
            Some("Use different images; the server may not have detected a face"),
        ),
        SwapError::JobTimeout { .. } => (true, Some("Retry; the service may be congested")),
        SwapError::WorkerFailed(_) => (true, Some("Retry after a short delay")),
        SwapError::InvalidResponse(_) => (true, Some("Retry after a short delay")),
    }
}

impl ErrorAdvice for SwapError {
    fn is_recoverable(&self) -> bool {
        swap_error_static_metadata(self).0
    }

    fn suggested_action(&self) -> Option<&'static str> {
        swap_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            SwapError::UnreadableFile(ref msg) => msg.clone(),
            SwapError::HashFailed(_) => "Could not compute the file checksum".to_string(),
            SwapError::AllRoutesExhausted { .. } => {
                "Could not reach the processing server through any route".to_string()
            }
            SwapError::RegistrationRejected(ref msg) => msg.clone(),
            SwapError::BinaryPutFailed(_) => "Uploading the file data failed".to_string(),
            SwapError::ConfirmationFailed(_) => "The upload could not be verified".to_string(),
            SwapError::SubmissionRejected(ref msg) => msg.clone(),
            SwapError::JobRejected(ref msg) => msg.clone(),
            SwapError::JobTimeout { .. } => "Processing took too long".to_string(),
            SwapError::WorkerFailed(ref msg) => msg.clone(),
            SwapError::InvalidResponse(_) => "The server returned an unexpected reply".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_file_is_recoverable() {
        let err = SwapError::UnreadableFile("access to photo.jpg was lost".to_string());
        assert!(err.is_recoverable());
        assert_eq!(err.suggested_action(), Some("Select the file again"));
        assert_eq!(err.client_message(), "access to photo.jpg was lost");
    }

    #[test]
    fn test_routes_exhausted_suggests_network_change() {
        let err = SwapError::AllRoutesExhausted { attempts: 5 };
        assert!(err.is_recoverable());
        assert!(err.suggested_action().unwrap().contains("VPN"));
        assert!(err.to_string().contains("5 attempts"));
    }

    #[test]
    fn test_job_rejected_is_terminal() {
        let err = SwapError::JobRejected("no face detected".to_string());
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "no face detected");
    }

    #[test]
    fn test_job_timeout_message() {
        let err = SwapError::JobTimeout { attempts: 120 };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("120 polls"));
    }
}
