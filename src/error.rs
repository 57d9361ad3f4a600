use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Prediction ID not found: {0}")]
    NotFound(String),

    #[error("Prediction is still being processed: {0}")]
    NotReady(String),

    #[error("Prediction ID already exists: {0}")]
    AlreadyExists(String),

    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),

    #[error("Compute failure: {0}")]
    ComputeFailure(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Service is shutting down")]
    ShuttingDown,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PredictError {
    /// Errors the caller can fix or retry, as opposed to server-side faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictError::Validation(_) | PredictError::NotFound(_) | PredictError::NotReady(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;
