pub mod job;
pub mod resource;
pub mod wire;

pub use job::{AddTaskRequest, Job, JobStatus, QueryTaskData, QueryTaskRequest};
pub use resource::{
    mime_for_extension, FileHandle, RegisterResourceRequest, ResourceDescriptor, UploadSession,
};
pub use wire::{ApiEnvelope, WorkerReply};
