//! Three-phase resource upload: register, binary put, confirm.
//!
//! Registration and confirmation go through the transport router; the binary
//! put writes directly to the server-issued locator, which supports
//! cross-origin writes natively and may be single-use, so it is attempted
//! exactly once and never rerouted.

use std::sync::Arc;

use crate::auth::processor_request;
use crate::dispatch::HttpDispatch;
use crate::hash::content_md5;
use crate::router::TransportRouter;
use swapkit_core::models::resource::IMAGE_RESOURCE_TYPE;
use swapkit_core::models::{ApiEnvelope, FileHandle, RegisterResourceRequest, ResourceDescriptor};
use swapkit_core::{ProcessorConfig, SwapError};

pub struct ResourceUploader {
    router: Arc<TransportRouter>,
    dispatch: Arc<dyn HttpDispatch>,
    processor: ProcessorConfig,
}

impl ResourceUploader {
    pub fn new(
        router: Arc<TransportRouter>,
        dispatch: Arc<dyn HttpDispatch>,
        processor: ProcessorConfig,
    ) -> Self {
        Self {
            router,
            dispatch,
            processor,
        }
    }

    /// Upload a file and return its server-assigned resource id.
    ///
    /// The id is returned only after the confirm phase succeeds, or
    /// immediately when the server already holds content with this hash.
    /// Once returned, the id is immutable and reusable across jobs.
    pub async fn upload(&self, file: &FileHandle) -> Result<String, SwapError> {
        let content_hash = content_md5(&file.bytes)?;

        let descriptor = self.register(file, &content_hash).await?;
        if descriptor.is_already_complete() {
            tracing::debug!(
                resource_no = %descriptor.no,
                md5 = %content_hash,
                "content already present server-side, skipping binary put"
            );
            return Ok(descriptor.no);
        }

        self.put_bytes(file, &descriptor).await?;
        self.confirm(&descriptor.no).await?;

        tracing::info!(
            resource_no = %descriptor.no,
            size_bytes = file.len,
            "resource upload complete"
        );
        Ok(descriptor.no)
    }

    async fn register(
        &self,
        file: &FileHandle,
        content_hash: &str,
    ) -> Result<ResourceDescriptor, SwapError> {
        let body = serde_json::to_value(RegisterResourceRequest {
            ext: file.extension(),
            md5_key: content_hash.to_string(),
            mime_type: file.mime_or_default().to_string(),
            size: file.len,
            resource_type: IMAGE_RESOURCE_TYPE,
        })
        .map_err(|e| SwapError::InvalidResponse(format!("encode registration request: {}", e)))?;

        let request = processor_request(&self.processor, "resource/upload", body);
        let value = self.router.send(&request).await?;

        let envelope: ApiEnvelope = serde_json::from_value(value)
            .map_err(|e| SwapError::InvalidResponse(format!("registration reply: {}", e)))?;
        if !envelope.is_success() {
            return Err(SwapError::RegistrationRejected(
                envelope
                    .message_or("the server refused to register the file")
                    .to_string(),
            ));
        }

        let data = envelope.data.ok_or_else(|| {
            SwapError::InvalidResponse("registration reply missing data".to_string())
        })?;
        serde_json::from_value(data)
            .map_err(|e| SwapError::InvalidResponse(format!("resource descriptor: {}", e)))
    }

    async fn put_bytes(
        &self,
        file: &FileHandle,
        descriptor: &ResourceDescriptor,
    ) -> Result<(), SwapError> {
        let locator = descriptor.url.as_deref().ok_or_else(|| {
            SwapError::InvalidResponse("registration reply missing write locator".to_string())
        })?;

        let reply = self
            .dispatch
            .put_binary(locator, file.mime_or_default(), file.bytes.clone())
            .await
            .map_err(|e| SwapError::BinaryPutFailed(e.to_string()))?;

        if !reply.is_success() {
            return Err(SwapError::BinaryPutFailed(format!(
                "storage returned HTTP {}",
                reply.status
            )));
        }
        Ok(())
    }

    async fn confirm(&self, resource_no: &str) -> Result<(), SwapError> {
        let request = processor_request(
            &self.processor,
            "resource/complete",
            serde_json::json!({ "no": resource_no }),
        );
        let value = self.router.send(&request).await?;

        let envelope: ApiEnvelope = serde_json::from_value(value)
            .map_err(|e| SwapError::InvalidResponse(format!("confirmation reply: {}", e)))?;
        // Confirmation accepts 200 only; 201 is a registration-time code.
        if envelope.code != 200 {
            return Err(SwapError::ConfirmationFailed(
                envelope
                    .message_or("the server did not acknowledge the upload")
                    .to_string(),
            ));
        }
        Ok(())
    }
}
