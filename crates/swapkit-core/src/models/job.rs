use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Job type tag the processing service expects for face swaps.
pub const SWAP_TASK_TYPE: u8 = 1;

/// Processing job status, decoded from the service's integer codes.
///
/// The service reports 1 = queued, 2 = running, 3 = succeeded,
/// 4 = failed, 5 = rejected. Any other value is carried through as
/// `Other` and treated as non-terminal: polling continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
    Rejected,
    Other(i64),
}

impl JobStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => JobStatus::Queued,
            2 => JobStatus::Running,
            3 => JobStatus::Succeeded,
            4 => JobStatus::Failed,
            5 => JobStatus::Rejected,
            other => JobStatus::Other(other),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Rejected
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Succeeded)
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Rejected => write!(f, "rejected"),
            JobStatus::Other(code) => write!(f, "unknown({})", code),
        }
    }
}

/// A processing job as observed by the client. The client never writes job
/// state; it only submits the job and watches the status.
#[derive(Debug, Clone)]
pub struct Job {
    pub task_no: String,
    pub target_no: String,
    pub swap_no: String,
    pub status: JobStatus,
    /// Present only when `status` is `Succeeded`.
    pub result_url: Option<String>,
}

impl Job {
    pub fn new(task_no: String, target_no: String, swap_no: String) -> Self {
        Self {
            task_no,
            target_no,
            swap_no,
            status: JobStatus::Queued,
            result_url: None,
        }
    }
}

/// Submission body for `task/add`. The service takes the source as a
/// collection even though exactly one source is supported.
#[derive(Debug, Serialize)]
pub struct AddTaskRequest {
    pub swap_no: Vec<String>,
    pub target_no: String,
    #[serde(rename = "type")]
    pub task_type: u8,
}

/// Query body for `task/query`.
#[derive(Debug, Serialize)]
pub struct QueryTaskRequest {
    pub task_no: String,
}

/// Payload of a `task/query` reply.
#[derive(Debug, Deserialize)]
pub struct QueryTaskData {
    pub status: i64,
    #[serde(default)]
    pub url: Option<String>,
}
