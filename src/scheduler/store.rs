use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{PredictError, Result};
use crate::scheduler::job::{Job, JobStatus, Prediction};

/// Per-status job counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCounts {
    pub pending: usize,
    pub ready: usize,
    pub failed: usize,
}

/// Source of truth for asynchronous job state.
///
/// Every operation takes the lock for its full duration, so a reader never
/// observes a half-applied transition. Entries are never evicted: memory
/// grows with the number of asynchronous submissions over the process
/// lifetime.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a Pending entry for a freshly issued identifier.
    pub async fn reserve(&self, id: Uuid, input: String) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&id) {
            return Err(PredictError::AlreadyExists(id.to_string()));
        }
        jobs.insert(id, Job::pending(id, input));
        Ok(())
    }

    /// Transition a Pending job to Ready.
    pub async fn complete(&self, id: &Uuid, output: Prediction) -> Result<()> {
        self.resolve(id, |job| {
            job.status = JobStatus::Ready;
            job.output = Some(output);
        })
        .await
    }

    /// Transition a Pending job to Failed.
    pub async fn fail(&self, id: &Uuid, error: String) -> Result<()> {
        self.resolve(id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(error);
        })
        .await
    }

    async fn resolve(&self, id: &Uuid, apply: impl FnOnce(&mut Job)) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| PredictError::NotFound(id.to_string()))?;

        // A job resolves exactly once.
        if job.is_resolved() {
            return Err(PredictError::InternalInconsistency(format!(
                "job {} already {}",
                id, job.status
            )));
        }

        apply(job);
        job.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Snapshot of the current entry.
    pub async fn get(&self, id: &Uuid) -> Result<Job> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PredictError::NotFound(id.to_string()))
    }

    pub async fn counts(&self) -> JobCounts {
        let jobs = self.jobs.read().await;
        jobs.values().fold(JobCounts::default(), |mut acc, job| {
            match job.status {
                JobStatus::Pending => acc.pending += 1,
                JobStatus::Ready => acc.ready += 1,
                JobStatus::Failed => acc.failed += 1,
            }
            acc
        })
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
