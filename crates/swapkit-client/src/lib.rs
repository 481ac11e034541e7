//! Resilient client for the remote face-swap processing service.
//!
//! The pieces, leaf-first: a content hasher ([`hash`]), an ordered-fallback
//! transport router ([`router`], [`routes`], [`envelope`]), a three-phase
//! resource uploader ([`uploader`]), a bounded job poller ([`jobs`]), thin
//! clients for the auxiliary worker endpoints ([`workers`]), and a session
//! state machine ([`session`]) that sequences a two-image swap end-to-end.
//!
//! [`SwapClient`] wires the pieces together from a [`swapkit_core::Config`];
//! every component also constructs standalone for callers that need a
//! different transport.

pub mod auth;
pub mod dispatch;
pub mod envelope;
pub mod hash;
pub mod jobs;
pub mod router;
pub mod routes;
pub mod session;
pub mod uploader;
pub mod workers;

#[cfg(test)]
pub(crate) mod test_support;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::{HttpConnector, HttpDispatch};
use crate::jobs::JobOrchestrator;
use crate::router::TransportRouter;
use crate::routes::standard_routes;
use crate::uploader::ResourceUploader;
use crate::workers::WorkerClient;
use swapkit_core::Config;

/// Fully wired client: uploader, job orchestrator, and worker endpoints
/// sharing one transport router.
pub struct SwapClient {
    uploader: Arc<ResourceUploader>,
    jobs: Arc<JobOrchestrator>,
    workers: WorkerClient,
}

impl SwapClient {
    pub fn new(config: Config) -> Result<Self> {
        let attempt_timeout = Duration::from_secs(config.transport.attempt_timeout_secs);
        let dispatch: Arc<dyn HttpDispatch> = Arc::new(HttpConnector::new(attempt_timeout)?);
        let router = Arc::new(TransportRouter::new(
            dispatch.clone(),
            standard_routes(&config.transport),
            attempt_timeout,
        ));

        let uploader = Arc::new(ResourceUploader::new(
            router.clone(),
            dispatch,
            config.processor.clone(),
        ));
        let jobs = Arc::new(JobOrchestrator::new(
            router,
            config.processor,
            config.polling,
        ));
        let workers = WorkerClient::new(config.workers)?;

        Ok(Self {
            uploader,
            jobs,
            workers,
        })
    }

    /// Build from environment variables (SWAPKIT_*), with the service
    /// contract defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn uploader(&self) -> &ResourceUploader {
        &self.uploader
    }

    pub fn jobs(&self) -> &JobOrchestrator {
        &self.jobs
    }

    pub fn workers(&self) -> &WorkerClient {
        &self.workers
    }

    /// Start a fresh swap session sharing this client's components.
    pub fn session(&self) -> SwapSession {
        SwapSession::new(self.uploader.clone(), self.jobs.clone())
    }
}

// Re-export the types callers handle directly.
pub use crate::dispatch::{DispatchError, HttpReply};
pub use crate::router::{ApiRequest, AttemptOutcome, RouteAttempt};
pub use crate::routes::Route;
pub use crate::session::{SessionStatus, SlotRole, SlotState, SwapSession};
pub use swapkit_core::{Config as ClientConfig, ErrorAdvice, SwapError};
