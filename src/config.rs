use std::net::SocketAddr;

use crate::error::{PredictError, Result};

/// Settings for the bundled mock model.
///
/// The model sleeps for a random duration in `[min_delay_ms, max_delay_ms]`
/// and answers with a random integer in `[min_result, max_result]`.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub min_result: u32,
    pub max_result: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 8_000,
            max_delay_ms: 15_000,
            min_result: 100,
            max_result: 10_000,
        }
    }
}

impl ModelConfig {
    /// A model that answers immediately.
    pub fn instant() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    /// Number of background worker loops. Must be at least 1.
    pub worker_count: usize,
    pub model: ModelConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            // SAFETY: This is a hardcoded valid address that will always parse
            listen_addr: "0.0.0.0:8080"
                .parse()
                .expect("default listen address is valid"),
            worker_count: 1,
            model: ModelConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(PredictError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.model.min_delay_ms > self.model.max_delay_ms {
            return Err(PredictError::Config(format!(
                "min delay {}ms exceeds max delay {}ms",
                self.model.min_delay_ms, self.model.max_delay_ms
            )));
        }
        if self.model.min_result > self.model.max_result {
            return Err(PredictError::Config(format!(
                "min result {} exceeds max result {}",
                self.model.min_result, self.model.max_result
            )));
        }
        Ok(())
    }
}
