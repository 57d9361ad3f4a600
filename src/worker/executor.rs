use std::sync::Arc;

use uuid::Uuid;

use crate::error::{PredictError, Result};
use crate::scheduler::{JobStatus, Prediction, Task};
use crate::worker::model::Predictor;

/// Result of running one task through the predictor.
#[derive(Debug)]
pub struct ExecutionResult {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub output: Option<Prediction>,
    pub error: Option<String>,
}

/// Runs the predictor in isolation and turns every outcome, including a
/// panic inside the predictor, into a `Result`. Shared by the synchronous
/// submit path and the worker pool.
#[derive(Clone)]
pub struct JobExecutor {
    predictor: Arc<dyn Predictor>,
}

impl std::fmt::Debug for JobExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobExecutor").finish_non_exhaustive()
    }
}

impl JobExecutor {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }

    /// Call the predictor on its own task so a panic cannot take down the
    /// caller. A panic or abort is reported as `ComputeFailure`.
    pub async fn predict(&self, input: &str) -> Result<String> {
        let predictor = self.predictor.clone();
        let input = input.to_string();

        match tokio::spawn(async move { predictor.predict(&input).await }).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => {
                tracing::error!("Predictor panicked");
                Err(PredictError::ComputeFailure("predictor panicked".to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, "Prediction task aborted");
                Err(PredictError::ComputeFailure(e.to_string()))
            }
        }
    }

    /// Execute a queued task. Never leaves the job unresolved.
    pub async fn execute(&self, task: Task) -> ExecutionResult {
        let Task { job_id, input } = task;
        tracing::info!(job_id = %job_id, "Executing job");

        let result = self.predict(&input).await;
        Self::process_output(job_id, input, result)
    }

    fn process_output(job_id: Uuid, input: String, result: Result<String>) -> ExecutionResult {
        match result {
            Ok(result) => {
                tracing::info!(job_id = %job_id, "Job completed");
                ExecutionResult {
                    job_id,
                    status: JobStatus::Ready,
                    output: Some(Prediction { input, result }),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Prediction failed");
                ExecutionResult {
                    job_id,
                    status: JobStatus::Failed,
                    output: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
