use serde::{Deserialize, Serialize};

/// Lifecycle of a background report job, polled via `GET /api/jobs/{job_id}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    /// Progress percentage, 0-100.
    InProgress(u32),
    /// Completion message, usually the path of the produced artifact.
    Completed(String),
    Failed(String),
}
