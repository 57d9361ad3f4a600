use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Ready,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Ready => write!(f, "ready"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Output of a prediction: the input echoed back with the model's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub input: String,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub input: String,
    pub status: JobStatus,
    pub output: Option<Prediction>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn pending(id: Uuid, input: String) -> Self {
        Self {
            id,
            input,
            status: JobStatus::Pending,
            output: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status != JobStatus::Pending
    }
}

/// Queued unit of work handed from the coordinator to a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub job_id: Uuid,
    pub input: String,
}

impl Task {
    pub fn new(job_id: Uuid, input: String) -> Self {
        Self { job_id, input }
    }
}
