use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::{PredictError, Result};
use crate::scheduler::{JobStatus, JobStore, TaskQueue};
use crate::worker::executor::{ExecutionResult, JobExecutor};

/// Fixed set of background loops draining the task queue.
///
/// Workers share nothing but the queue and the store. The pool stops when
/// the queue is closed and drained; call [`WorkerPool::join`] to wait for
/// that.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn start(
        worker_count: usize,
        queue: TaskQueue,
        store: Arc<JobStore>,
        executor: JobExecutor,
    ) -> Result<Self> {
        if worker_count == 0 {
            return Err(PredictError::Config(
                "worker pool needs at least one worker".to_string(),
            ));
        }

        let handles = (0..worker_count)
            .map(|worker_id| {
                let queue = queue.clone();
                let store = store.clone();
                let executor = executor.clone();
                tokio::spawn(async move {
                    Self::worker_loop(worker_id, queue, store, executor).await;
                })
            })
            .collect();

        tracing::info!(worker_count, "Worker pool started");
        Ok(Self { handles })
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Worker exited abnormally");
            }
        }
        tracing::info!("Worker pool stopped");
    }

    async fn worker_loop(
        worker_id: usize,
        queue: TaskQueue,
        store: Arc<JobStore>,
        executor: JobExecutor,
    ) {
        tracing::debug!(worker_id, "Worker started");

        while let Some(task) = queue.dequeue().await {
            tracing::debug!(worker_id, job_id = %task.job_id, "Task dequeued");
            let result = executor.execute(task).await;
            Self::publish(&store, result).await;
        }

        tracing::debug!(worker_id, "Worker received shutdown, exiting");
    }

    /// Write the outcome into the store. Store errors mean an invariant was
    /// broken; they are logged and the worker moves on.
    async fn publish(store: &JobStore, result: ExecutionResult) {
        let job_id = result.job_id;
        let outcome = match (result.status, result.output) {
            (JobStatus::Ready, Some(output)) => store.complete(&job_id, output).await,
            _ => {
                let error = result
                    .error
                    .unwrap_or_else(|| "prediction produced no output".to_string());
                store.fail(&job_id, error).await
            }
        };

        if let Err(e) = outcome {
            tracing::error!(job_id = %job_id, error = %e, "Failed to publish job result");
        }
    }
}
