//! Background execution of queued predictions.
//!
//! - [`Predictor`]: the compute function shared by the sync and async paths
//! - [`MockModel`]: bundled predictor with random latency and result
//! - [`JobExecutor`]: runs one task and maps every outcome to a terminal status
//! - [`WorkerPool`]: N loops that dequeue tasks and publish results to the store
//!
//! # Execution Flow
//!
//! 1. A worker blocks on [`TaskQueue::dequeue`](crate::scheduler::TaskQueue::dequeue)
//! 2. [`JobExecutor::execute`] calls the predictor on a separate task
//! 3. The worker writes Ready or Failed into the [`JobStore`](crate::scheduler::JobStore)
//! 4. When the queue is closed and empty, the loop exits

pub mod executor;
pub mod model;
pub mod pool;

pub use executor::{ExecutionResult, JobExecutor};
pub use model::{MockModel, Predictor};
pub use pool::WorkerPool;
