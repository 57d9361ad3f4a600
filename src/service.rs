use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::{run_api, ApiState};
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::scheduler::{JobCoordinator, JobStore, TaskQueue};
use crate::worker::{JobExecutor, MockModel, Predictor, WorkerPool};

/// Owns every component of a running service.
pub struct PredictionService {
    pub config: ServiceConfig,
    pub store: Arc<JobStore>,
    pub queue: TaskQueue,
    pub coordinator: JobCoordinator,
    predictor: Arc<dyn Predictor>,
}

impl PredictionService {
    /// Build a service backed by the bundled mock model.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let predictor = Arc::new(MockModel::new(config.model.clone()));
        Self::with_predictor(config, predictor)
    }

    pub fn with_predictor(config: ServiceConfig, predictor: Arc<dyn Predictor>) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(JobStore::new());
        let queue = TaskQueue::new();
        let coordinator = JobCoordinator::new(store.clone(), queue.clone(), predictor.clone());

        Ok(Self {
            config,
            store,
            queue,
            coordinator,
            predictor,
        })
    }

    pub fn api_state(&self) -> ApiState {
        ApiState {
            coordinator: self.coordinator.clone(),
            worker_count: self.config.worker_count,
        }
    }

    pub fn start_workers(&self) -> Result<WorkerPool> {
        WorkerPool::start(
            self.config.worker_count,
            self.queue.clone(),
            self.store.clone(),
            JobExecutor::new(self.predictor.clone()),
        )
    }

    /// Run the service until `shutdown` is cancelled.
    ///
    /// 1. Starts the worker pool
    /// 2. Serves the HTTP API (blocking)
    /// 3. Closes the task queue once the server has stopped
    /// 4. Waits for workers to drain the queue and exit
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot start or the API server
    /// fails. Workers are still drained and joined when the server fails.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let pool = self.start_workers()?;

        let served = run_api(self.config.listen_addr, self.api_state(), shutdown).await;

        let queued = self.queue.len();
        self.queue.close();
        tracing::info!(queued, "Task queue closed, draining workers");
        pool.join().await;

        served
    }
}
