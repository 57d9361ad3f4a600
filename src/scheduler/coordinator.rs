use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{PredictError, Result};
use crate::scheduler::job::{JobStatus, Prediction, Task};
use crate::scheduler::queue::TaskQueue;
use crate::scheduler::store::{JobCounts, JobStore};
use crate::worker::{JobExecutor, Predictor};

pub const ACCEPTED_MESSAGE: &str = "Request received. Processing asynchronously.";

/// How a submission is executed. Always chosen explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitMode {
    #[default]
    Sync,
    Async,
}

impl SubmitMode {
    pub fn from_async_flag(is_async: bool) -> Self {
        if is_async {
            SubmitMode::Async
        } else {
            SubmitMode::Sync
        }
    }

    /// Parse a textual async flag.
    ///
    /// Accepts `true|1|yes|on` and `false|0|no|off`, ignoring ASCII case and
    /// surrounding whitespace. Anything else, including an empty value, is
    /// rejected rather than guessed at.
    pub fn parse_flag(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(SubmitMode::Async),
            "false" | "0" | "no" | "off" => Ok(SubmitMode::Sync),
            other => Err(PredictError::Validation(format!(
                "async mode flag must be a boolean, got {:?}",
                other
            ))),
        }
    }
}

/// Handle returned to an asynchronous caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsyncAccepted {
    pub message: String,
    pub prediction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Synchronous submission finished.
    Completed(Prediction),
    /// Asynchronous submission queued.
    Accepted(AsyncAccepted),
}

/// A finished asynchronous prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub prediction_id: String,
    pub output: Prediction,
}

/// Entry point for submit and poll.
///
/// Sync submissions run the predictor in the caller's request (isolated on
/// its own task so a panic becomes `ComputeFailure`) and store nothing. Async
/// submissions reserve an identifier in the store before the task is queued,
/// so the returned handle always refers to an existing entry.
#[derive(Clone)]
pub struct JobCoordinator {
    store: Arc<JobStore>,
    queue: TaskQueue,
    executor: JobExecutor,
}

impl std::fmt::Debug for JobCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobCoordinator")
            .field("store", &self.store)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl JobCoordinator {
    pub fn new(store: Arc<JobStore>, queue: TaskQueue, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            store,
            queue,
            executor: JobExecutor::new(predictor),
        }
    }

    pub async fn submit(&self, input: String, mode: SubmitMode) -> Result<SubmitOutcome> {
        validate_input(&input)?;

        match mode {
            SubmitMode::Sync => {
                let result = self.executor.predict(&input).await?;
                Ok(SubmitOutcome::Completed(Prediction { input, result }))
            }
            SubmitMode::Async => self.submit_async(input).await.map(SubmitOutcome::Accepted),
        }
    }

    async fn submit_async(&self, input: String) -> Result<AsyncAccepted> {
        if self.queue.is_closed() {
            return Err(PredictError::ShuttingDown);
        }

        // v4 UUIDs carry 122 random bits; no lookup for prior use is needed.
        let job_id = Uuid::new_v4();

        if let Err(e) = self.store.reserve(job_id, input.clone()).await {
            tracing::error!(job_id = %job_id, error = %e, "Identifier collision on reserve");
            return Err(PredictError::InternalInconsistency(e.to_string()));
        }

        if let Err(e) = self.queue.enqueue(Task::new(job_id, input)) {
            // The queue closed between the check above and now.
            if let Err(fail_err) = self.store.fail(&job_id, e.to_string()).await {
                tracing::error!(
                    job_id = %job_id,
                    error = %fail_err,
                    "Failed to resolve unqueued job"
                );
            }
            return Err(e);
        }

        tracing::info!(job_id = %job_id, "Prediction queued");
        Ok(AsyncAccepted {
            message: ACCEPTED_MESSAGE.to_string(),
            prediction_id: job_id.to_string(),
        })
    }

    pub async fn poll(&self, prediction_id: &str) -> Result<PredictionResult> {
        // Handles are issued in lowercase hyphenated form only. Other spellings
        // of the same UUID (uppercase, braced, urn:uuid:) were never issued.
        let job_id = Uuid::parse_str(prediction_id)
            .ok()
            .filter(|id| id.hyphenated().to_string() == prediction_id)
            .ok_or_else(|| PredictError::NotFound(prediction_id.to_string()))?;

        let job = self.store.get(&job_id).await?;
        match job.status {
            JobStatus::Pending => Err(PredictError::NotReady(prediction_id.to_string())),
            JobStatus::Failed => Err(PredictError::PredictionFailed(
                job.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
            JobStatus::Ready => {
                let output = job.output.ok_or_else(|| {
                    PredictError::InternalInconsistency(format!(
                        "job {} is ready without output",
                        job_id
                    ))
                })?;
                Ok(PredictionResult {
                    prediction_id: job_id.to_string(),
                    output,
                })
            }
        }
    }

    pub async fn job_counts(&self) -> JobCounts {
        self.store.counts().await
    }

    pub fn queued_tasks(&self) -> usize {
        self.queue.len()
    }
}

pub fn validate_input(input: &str) -> Result<()> {
    if input.is_empty() {
        return Err(PredictError::Validation(
            "input must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}
