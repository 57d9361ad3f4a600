//! Test harness for prediction service integration tests.
//!
//! Provides predictors with controllable behaviour and helpers for wiring a
//! coordinator, store, queue and worker pool together.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use predict_lite::error::{PredictError, Result};
use predict_lite::scheduler::{JobCoordinator, JobStore, PredictionResult, TaskQueue};
use predict_lite::worker::{JobExecutor, Predictor, WorkerPool};

/// Deterministic predictor: the result encodes the input.
#[derive(Debug, Default)]
pub struct EchoModel {
    pub calls: AtomicUsize,
}

impl EchoModel {
    pub fn result_for(input: &str) -> String {
        format!("echo:{}", input)
    }
}

#[async_trait]
impl Predictor for EchoModel {
    async fn predict(&self, input: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::result_for(input))
    }
}

/// Predictor that blocks until the test hands out a permit.
#[derive(Debug)]
pub struct GatedModel {
    gate: Semaphore,
}

impl GatedModel {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
        }
    }

    /// Let `n` pending predictions finish.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl Predictor for GatedModel {
    async fn predict(&self, input: &str) -> Result<String> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| PredictError::ComputeFailure(e.to_string()))?;
        permit.forget();
        Ok(EchoModel::result_for(input))
    }
}

/// Predictor that fails for inputs starting with "fail" and echoes otherwise.
#[derive(Debug, Default)]
pub struct FlakyModel;

#[async_trait]
impl Predictor for FlakyModel {
    async fn predict(&self, input: &str) -> Result<String> {
        if input.starts_with("fail") {
            return Err(PredictError::ComputeFailure("model rejected input".to_string()));
        }
        Ok(EchoModel::result_for(input))
    }
}

/// Predictor that panics for inputs starting with "panic" and echoes otherwise.
#[derive(Debug, Default)]
pub struct PanickyModel;

#[async_trait]
impl Predictor for PanickyModel {
    async fn predict(&self, input: &str) -> Result<String> {
        if input.starts_with("panic") {
            panic!("model blew up");
        }
        Ok(EchoModel::result_for(input))
    }
}

/// Coordinator plus the components it shares with the worker pool.
pub struct TestService {
    pub coordinator: JobCoordinator,
    pub store: Arc<JobStore>,
    pub queue: TaskQueue,
    pub predictor: Arc<dyn Predictor>,
}

impl TestService {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        let store = Arc::new(JobStore::new());
        let queue = TaskQueue::new();
        let coordinator = JobCoordinator::new(store.clone(), queue.clone(), predictor.clone());
        Self {
            coordinator,
            store,
            queue,
            predictor,
        }
    }

    pub fn start_workers(&self, worker_count: usize) -> WorkerPool {
        WorkerPool::start(
            worker_count,
            self.queue.clone(),
            self.store.clone(),
            JobExecutor::new(self.predictor.clone()),
        )
        .unwrap()
    }
}

/// Poll until the prediction is ready or the timeout elapses.
pub async fn wait_for_ready(
    coordinator: &JobCoordinator,
    prediction_id: &str,
    timeout: Duration,
) -> Option<PredictionResult> {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        match coordinator.poll(prediction_id).await {
            Ok(result) => return Some(result),
            Err(PredictError::NotReady(_)) => {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            Err(_) => return None,
        }
    }
    None
}

/// Poll until the job leaves the Pending state, returning the final poll result.
pub async fn wait_for_resolution(
    coordinator: &JobCoordinator,
    prediction_id: &str,
    timeout: Duration,
) -> Option<Result<PredictionResult>> {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        match coordinator.poll(prediction_id).await {
            Err(PredictError::NotReady(_)) => {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            other => return Some(other),
        }
    }
    None
}
