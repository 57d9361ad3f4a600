pub mod coordinator;
pub mod job;
pub mod queue;
pub mod store;

pub use coordinator::{
    AsyncAccepted, JobCoordinator, PredictionResult, SubmitMode, SubmitOutcome,
};
pub use job::{Job, JobStatus, Prediction, Task};
pub use queue::TaskQueue;
pub use store::{JobCounts, JobStore};
