//! Per-session state for a two-image swap.
//!
//! The session owns two independent file slots (target, source), uploads a
//! selection as soon as it is made, and gates job execution on both slots
//! being ready. It is the only layer that maps typed failures to
//! user-visible state: an access error clears exactly the affected slot;
//! every other terminal failure moves the session to `Failed`.

use std::path::Path;
use std::sync::Arc;

use crate::hash::read_file;
use crate::jobs::JobOrchestrator;
use crate::uploader::ResourceUploader;
use swapkit_core::models::Job;
use swapkit_core::{ErrorAdvice, SwapError};

/// Which image a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    /// The base image whose face is replaced.
    Target,
    /// The image supplying the face.
    Source,
}

impl std::fmt::Display for SlotRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotRole::Target => write!(f, "target"),
            SlotRole::Source => write!(f, "source"),
        }
    }
}

/// Lifecycle of one file slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Uploading,
    /// Upload confirmed; holds the server-assigned resource id.
    Ready(String),
    /// The file became unreadable; the selection was cleared and the user
    /// must pick it again.
    AccessError,
}

/// Session-level status. Slot upload progress lives in the slot states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Submitting,
    Polling,
    Succeeded(String),
    Failed(String),
}

#[derive(Debug)]
struct FileSlot {
    state: SlotState,
}

impl FileSlot {
    fn new() -> Self {
        Self {
            state: SlotState::Empty,
        }
    }

    fn state(&self) -> &SlotState {
        &self.state
    }

    fn set(&mut self, state: SlotState) {
        self.state = state;
    }

    fn resource_no(&self) -> Option<&str> {
        match &self.state {
            SlotState::Ready(no) => Some(no),
            _ => None,
        }
    }
}

pub struct SwapSession {
    uploader: Arc<ResourceUploader>,
    jobs: Arc<JobOrchestrator>,
    target: FileSlot,
    source: FileSlot,
    status: SessionStatus,
    job: Option<Job>,
    last_error: Option<SwapError>,
}

impl SwapSession {
    pub fn new(uploader: Arc<ResourceUploader>, jobs: Arc<JobOrchestrator>) -> Self {
        Self {
            uploader,
            jobs,
            target: FileSlot::new(),
            source: FileSlot::new(),
            status: SessionStatus::Idle,
            job: None,
            last_error: None,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn slot_state(&self, role: SlotRole) -> &SlotState {
        match role {
            SlotRole::Target => self.target.state(),
            SlotRole::Source => self.source.state(),
        }
    }

    pub fn last_error(&self) -> Option<&SwapError> {
        self.last_error.as_ref()
    }

    pub fn result_url(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Succeeded(url) => Some(url),
            _ => None,
        }
    }

    /// The job observed by the last `execute`, if any.
    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    fn is_busy(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::Submitting | SessionStatus::Polling
        )
    }

    /// Both slots confirmed and no job in flight.
    pub fn can_execute(&self) -> bool {
        !self.is_busy()
            && self.target.resource_no().is_some()
            && self.source.resource_no().is_some()
    }

    /// Select a file for a slot and upload it immediately.
    ///
    /// Replacing a `Ready` or `AccessError` slot re-enters `Uploading`; the
    /// previous selection is dropped. The other slot is never touched.
    pub async fn select_file(&mut self, role: SlotRole, path: impl AsRef<Path>) {
        if self.is_busy() {
            tracing::debug!(role = %role, "selection ignored while a job is in flight");
            return;
        }

        self.last_error = None;
        self.slot_mut(role).set(SlotState::Uploading);

        let uploader = self.uploader.clone();
        let uploaded = match read_file(path).await {
            Ok(file) => uploader.upload(&file).await,
            Err(e) => Err(e),
        };

        match uploaded {
            Ok(no) => {
                tracing::info!(role = %role, resource_no = %no, "slot ready");
                self.slot_mut(role).set(SlotState::Ready(no));
            }
            Err(e @ SwapError::UnreadableFile(_)) => {
                tracing::warn!(role = %role, error = %e, "slot lost access to its file");
                self.slot_mut(role).set(SlotState::AccessError);
                self.last_error = Some(e);
            }
            Err(e) => {
                tracing::warn!(role = %role, error = %e, "slot upload failed");
                self.slot_mut(role).set(SlotState::Empty);
                self.last_error = Some(e);
            }
        }
    }

    /// Submit the swap job and poll it to completion.
    ///
    /// A no-op unless both slots are ready and no job is in flight.
    pub async fn execute(&mut self) {
        if !self.can_execute() {
            tracing::debug!("execute ignored: slots not ready or job in flight");
            return;
        }
        let target_no = self.target.resource_no().unwrap_or_default().to_string();
        let source_no = self.source.resource_no().unwrap_or_default().to_string();

        self.status = SessionStatus::Submitting;
        self.last_error = None;
        self.job = None;

        let jobs = self.jobs.clone();
        let mut job = match jobs.submit(&target_no, &source_no).await {
            Ok(job) => job,
            Err(e) => {
                self.fail(e);
                return;
            }
        };

        self.status = SessionStatus::Polling;
        let outcome = jobs.poll_until_done(&mut job).await;
        self.job = Some(job);
        match outcome {
            Ok(url) => self.status = SessionStatus::Succeeded(url),
            Err(e) => self.fail(e),
        }
    }

    /// Clear both slots, all derived identifiers, the result, and any error,
    /// returning to `Idle`. Dropping the slots releases their selections.
    pub fn reset(&mut self) {
        self.target = FileSlot::new();
        self.source = FileSlot::new();
        self.status = SessionStatus::Idle;
        self.job = None;
        self.last_error = None;
    }

    fn slot_mut(&mut self, role: SlotRole) -> &mut FileSlot {
        match role {
            SlotRole::Target => &mut self.target,
            SlotRole::Source => &mut self.source,
        }
    }

    fn fail(&mut self, e: SwapError) {
        self.status = SessionStatus::Failed(e.client_message());
        self.last_error = Some(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::TransportRouter;
    use crate::routes::Route;
    use crate::test_support::{Script, ScriptedDispatch};
    use std::io::Write;
    use std::time::Duration;
    use swapkit_core::{Config, PollingConfig};

    fn session_with(script: Vec<Script>, routes: Vec<Route>) -> (SwapSession, Arc<ScriptedDispatch>) {
        let dispatch = Arc::new(ScriptedDispatch::new(script));
        let router = Arc::new(TransportRouter::new(
            dispatch.clone(),
            routes,
            Duration::from_millis(50),
        ));
        let processor = Config::default().processor;
        let uploader = Arc::new(ResourceUploader::new(
            router.clone(),
            dispatch.clone(),
            processor.clone(),
        ));
        let jobs = Arc::new(JobOrchestrator::new(
            router,
            processor,
            PollingConfig {
                interval_secs: 0,
                max_attempts: 120,
            },
        ));
        (SwapSession::new(uploader, jobs), dispatch)
    }

    fn temp_image(content: &[u8]) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        tmp.write_all(content).unwrap();
        tmp
    }

    fn dedup_reply(no: &str) -> Script {
        Script::ok(format!(
            r#"{{"code":200,"data":{{"no":"{}","status":"success"}}}}"#,
            no
        ))
    }

    #[tokio::test]
    async fn test_end_to_end_swap_succeeds() {
        let (mut session, dispatch) = session_with(
            vec![
                dedup_reply("tgt-1"),
                dedup_reply("src-1"),
                Script::ok(r#"{"code":200,"data":{"task_no":"task-9"}}"#),
                Script::ok(r#"{"code":200,"data":{"status":2}}"#),
                Script::ok(r#"{"code":200,"data":{"status":2}}"#),
                Script::ok(r#"{"code":200,"data":{"status":3,"url":"https://cdn.example/out.jpg"}}"#),
            ],
            vec![Route::Direct],
        );

        let target = temp_image(b"target bytes");
        let source = temp_image(b"source bytes");

        session.select_file(SlotRole::Target, target.path()).await;
        assert_eq!(
            session.slot_state(SlotRole::Target),
            &SlotState::Ready("tgt-1".to_string())
        );
        assert!(!session.can_execute());

        session.select_file(SlotRole::Source, source.path()).await;
        assert!(session.can_execute());

        session.execute().await;
        assert_eq!(
            session.status(),
            &SessionStatus::Succeeded("https://cdn.example/out.jpg".to_string())
        );
        assert_eq!(session.result_url(), Some("https://cdn.example/out.jpg"));
        let job = session.job().unwrap();
        assert_eq!(job.task_no, "task-9");
        assert_eq!(job.target_no, "tgt-1");
        assert_eq!(job.swap_no, "src-1");
        // register x2, add, query x3
        assert_eq!(dispatch.call_count(), 6);
    }

    #[tokio::test]
    async fn test_access_error_clears_only_affected_slot() {
        let (mut session, _dispatch) = session_with(vec![dedup_reply("tgt-1")], vec![Route::Direct]);

        let target = temp_image(b"target bytes");
        session.select_file(SlotRole::Target, target.path()).await;
        assert_eq!(
            session.slot_state(SlotRole::Target),
            &SlotState::Ready("tgt-1".to_string())
        );

        session
            .select_file(SlotRole::Source, "/nonexistent/source.jpg")
            .await;
        assert_eq!(session.slot_state(SlotRole::Source), &SlotState::AccessError);
        assert_eq!(
            session.slot_state(SlotRole::Target),
            &SlotState::Ready("tgt-1".to_string())
        );
        assert!(matches!(
            session.last_error(),
            Some(SwapError::UnreadableFile(_))
        ));
        assert!(!session.can_execute());
    }

    #[tokio::test]
    async fn test_route_exhaustion_surfaces_without_touching_other_slot() {
        let (mut session, dispatch) = session_with(
            vec![
                dedup_reply("tgt-1"),
                Script::status(500, ""),
                Script::status(502, ""),
            ],
            vec![
                Route::Direct,
                Route::passthrough("allorigins", "https://api.allorigins.win/raw?url="),
            ],
        );

        let target = temp_image(b"target bytes");
        session.select_file(SlotRole::Target, target.path()).await;

        let source = temp_image(b"source bytes");
        session.select_file(SlotRole::Source, source.path()).await;

        assert_eq!(session.slot_state(SlotRole::Source), &SlotState::Empty);
        assert_eq!(
            session.slot_state(SlotRole::Target),
            &SlotState::Ready("tgt-1".to_string())
        );
        assert!(matches!(
            session.last_error(),
            Some(SwapError::AllRoutesExhausted { attempts: 2 })
        ));
        assert_eq!(dispatch.call_count(), 3);
    }

    #[tokio::test]
    async fn test_execute_is_gated_on_both_slots() {
        let (mut session, dispatch) = session_with(vec![dedup_reply("tgt-1")], vec![Route::Direct]);

        let target = temp_image(b"target bytes");
        session.select_file(SlotRole::Target, target.path()).await;

        session.execute().await;
        assert_eq!(session.status(), &SessionStatus::Idle);
        // only the one registration call; no job was submitted
        assert_eq!(dispatch.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rejected_job_fails_session() {
        let (mut session, _dispatch) = session_with(
            vec![
                dedup_reply("tgt-1"),
                dedup_reply("src-1"),
                Script::ok(r#"{"code":200,"data":{"task_no":"task-2"}}"#),
                Script::ok(r#"{"code":200,"data":{"status":5}}"#),
            ],
            vec![Route::Direct],
        );

        let target = temp_image(b"target bytes");
        let source = temp_image(b"source bytes");
        session.select_file(SlotRole::Target, target.path()).await;
        session.select_file(SlotRole::Source, source.path()).await;

        session.execute().await;
        assert!(matches!(session.status(), SessionStatus::Failed(_)));
        assert!(matches!(
            session.last_error(),
            Some(SwapError::JobRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_replacing_ready_slot_reuploads() {
        let (mut session, _dispatch) = session_with(
            vec![dedup_reply("tgt-1"), dedup_reply("tgt-2")],
            vec![Route::Direct],
        );

        let first = temp_image(b"first");
        session.select_file(SlotRole::Target, first.path()).await;
        assert_eq!(
            session.slot_state(SlotRole::Target),
            &SlotState::Ready("tgt-1".to_string())
        );

        let second = temp_image(b"second");
        session.select_file(SlotRole::Target, second.path()).await;
        assert_eq!(
            session.slot_state(SlotRole::Target),
            &SlotState::Ready("tgt-2".to_string())
        );
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let (mut session, _dispatch) = session_with(
            vec![
                dedup_reply("tgt-1"),
                dedup_reply("src-1"),
                Script::ok(r#"{"code":200,"data":{"task_no":"task-3"}}"#),
                Script::ok(r#"{"code":200,"data":{"status":3,"url":"https://cdn.example/done.jpg"}}"#),
            ],
            vec![Route::Direct],
        );

        let target = temp_image(b"target bytes");
        let source = temp_image(b"source bytes");
        session.select_file(SlotRole::Target, target.path()).await;
        session.select_file(SlotRole::Source, source.path()).await;
        session.execute().await;
        assert!(session.result_url().is_some());

        session.reset();
        assert_eq!(session.status(), &SessionStatus::Idle);
        assert_eq!(session.slot_state(SlotRole::Target), &SlotState::Empty);
        assert_eq!(session.slot_state(SlotRole::Source), &SlotState::Empty);
        assert!(session.job().is_none());
        assert!(session.last_error().is_none());
        assert!(session.result_url().is_none());
    }
}
