//! Job submission and bounded status polling.
//!
//! A job references two confirmed resource ids (target, source). The client
//! submits it once and then only observes status; it never writes job state
//! server-side. Polling runs at a fixed interval up to an attempt ceiling,
//! independent of the per-call transport timeouts. Abandoning the loop needs
//! no cleanup; the job simply continues server-side unobserved.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::auth::processor_request;
use crate::router::TransportRouter;
use serde::Deserialize;
use swapkit_core::models::job::SWAP_TASK_TYPE;
use swapkit_core::models::{
    AddTaskRequest, ApiEnvelope, Job, JobStatus, QueryTaskData, QueryTaskRequest,
};
use swapkit_core::{PollingConfig, ProcessorConfig, SwapError};

#[derive(Debug, Deserialize)]
struct AddTaskData {
    task_no: String,
}

pub struct JobOrchestrator {
    router: Arc<TransportRouter>,
    processor: ProcessorConfig,
    polling: PollingConfig,
}

impl JobOrchestrator {
    pub fn new(
        router: Arc<TransportRouter>,
        processor: ProcessorConfig,
        polling: PollingConfig,
    ) -> Self {
        Self {
            router,
            processor,
            polling,
        }
    }

    /// Submit a swap job for two confirmed resources.
    pub async fn submit(&self, target_no: &str, source_no: &str) -> Result<Job, SwapError> {
        let body = serde_json::to_value(AddTaskRequest {
            swap_no: vec![source_no.to_string()],
            target_no: target_no.to_string(),
            task_type: SWAP_TASK_TYPE,
        })
        .map_err(|e| SwapError::InvalidResponse(format!("encode submission: {}", e)))?;

        let request = processor_request(&self.processor, "task/add", body);
        let value = self.router.send(&request).await?;

        let envelope: ApiEnvelope = serde_json::from_value(value)
            .map_err(|e| SwapError::InvalidResponse(format!("submission reply: {}", e)))?;
        if envelope.code != 200 {
            return Err(SwapError::SubmissionRejected(
                envelope
                    .message_or("the server refused to create the job")
                    .to_string(),
            ));
        }

        let data: AddTaskData = envelope
            .data
            .ok_or_else(|| SwapError::InvalidResponse("submission reply missing data".to_string()))
            .and_then(|d| {
                serde_json::from_value(d)
                    .map_err(|e| SwapError::InvalidResponse(format!("submission data: {}", e)))
            })?;

        tracing::info!(task_no = %data.task_no, "swap job submitted");
        Ok(Job::new(
            data.task_no,
            target_no.to_string(),
            source_no.to_string(),
        ))
    }

    /// One status observation. Returns the decoded status and, on success,
    /// the result locator.
    pub async fn poll_once(
        &self,
        task_no: &str,
    ) -> Result<(JobStatus, Option<String>), SwapError> {
        let body = serde_json::to_value(QueryTaskRequest {
            task_no: task_no.to_string(),
        })
        .map_err(|e| SwapError::InvalidResponse(format!("encode status query: {}", e)))?;

        let request = processor_request(&self.processor, "task/query", body);
        let value = self.router.send(&request).await?;

        let envelope: ApiEnvelope = serde_json::from_value(value)
            .map_err(|e| SwapError::InvalidResponse(format!("status reply: {}", e)))?;
        if envelope.code != 200 {
            return Err(SwapError::InvalidResponse(
                envelope.message_or("job status query failed").to_string(),
            ));
        }

        let data: QueryTaskData = envelope
            .data
            .ok_or_else(|| SwapError::InvalidResponse("status reply missing data".to_string()))
            .and_then(|d| {
                serde_json::from_value(d)
                    .map_err(|e| SwapError::InvalidResponse(format!("status data: {}", e)))
            })?;

        let status = JobStatus::from_code(data.status);
        let url = if status.is_success() { data.url } else { None };
        Ok((status, url))
    }

    /// Poll until the job reaches a terminal state or the attempt ceiling,
    /// updating `job` with each observation.
    ///
    /// Transport failures propagate immediately; the router already performs
    /// its own route fallback per call. A success report without a result
    /// locator is treated as still in progress.
    pub async fn poll_until_done(&self, job: &mut Job) -> Result<String, SwapError> {
        let interval = Duration::from_secs(self.polling.interval_secs);

        for attempt in 1..=self.polling.max_attempts {
            let (status, url) = self.poll_once(&job.task_no).await?;
            job.status = status;

            match status {
                JobStatus::Succeeded => {
                    if let Some(url) = url {
                        job.result_url = Some(url.clone());
                        tracing::info!(task_no = %job.task_no, attempt, "swap job succeeded");
                        return Ok(url);
                    }
                }
                JobStatus::Failed | JobStatus::Rejected => {
                    tracing::warn!(task_no = %job.task_no, status = %status, "swap job rejected");
                    return Err(SwapError::JobRejected(
                        "processing was stopped by the server; a face may not have been \
                         detected or the image is unsupported"
                            .to_string(),
                    ));
                }
                _ => {}
            }

            tracing::debug!(task_no = %job.task_no, attempt, status = %status, "job still in progress");
            if attempt < self.polling.max_attempts {
                sleep(interval).await;
            }
        }

        Err(SwapError::JobTimeout {
            attempts: self.polling.max_attempts,
        })
    }
}
