use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::config::ModelConfig;
use crate::error::Result;

/// The compute function behind both invocation modes.
///
/// Implementations return the raw result for `input`; callers pair it with
/// the input to build a [`Prediction`](crate::scheduler::Prediction).
/// Failures are reported as [`PredictError::ComputeFailure`](crate::error::PredictError).
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, input: &str) -> Result<String>;
}

/// Stand-in model: waits a random time, then returns a random number.
#[derive(Debug, Clone)]
pub struct MockModel {
    config: ModelConfig,
}

impl MockModel {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    fn sample(&self) -> (Duration, u32) {
        let mut rng = rand::thread_rng();
        let delay_ms = rng.gen_range(self.config.min_delay_ms..=self.config.max_delay_ms);
        let result = rng.gen_range(self.config.min_result..=self.config.max_result);
        (Duration::from_millis(delay_ms), result)
    }
}

#[async_trait]
impl Predictor for MockModel {
    async fn predict(&self, input: &str) -> Result<String> {
        let (delay, result) = self.sample();
        tracing::debug!(
            input_len = input.len(),
            delay_ms = delay.as_millis() as u64,
            "Running mock model"
        );
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(result.to_string())
    }
}
