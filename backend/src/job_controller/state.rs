//! Tracks long-running report jobs (bulk PDF export, email dispatch)
//! outside the request/response cycle.
//!
//! Workers run on the blocking thread pool and report progress through an
//! MPSC channel; `start_job_updater` folds those messages into the shared
//! job map, which `GET /api/jobs/{job_id}` reads.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Shared state of all background jobs, injected into Actix as `web::Data`.
#[derive(Clone)]
pub struct JobsState {
    /// Job id -> current status. Single source of truth for polling.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,
    /// Sender side of the updater channel. Workers push `JobUpdate`s here
    /// instead of writing the map directly.
    pub tx: mpsc::Sender<JobUpdate>,
}

impl JobsState {
    /// Register a fresh job as `Pending` and return its id.
    pub async fn register(&self) -> String {
        let job_id = uuid::Uuid::new_v4().to_string();
        self.jobs
            .write()
            .await
            .insert(job_id.clone(), JobStatus::Pending);
        job_id
    }
}

/// A status change for one job.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobUpdate {
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> JobUpdate {
        JobUpdate {
            job_id: job_id.into(),
            status,
        }
    }
}

/// Long-running task that applies `JobUpdate`s to the shared map. Spawned
/// once from `main`.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id.clone(), update.status);
    }
}
