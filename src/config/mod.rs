//! Pool configuration
//!
//! A [`PoolConfig`] sizes the worker pool and its two queues, picks the order
//! results are returned in and optionally bounds the whole batch by a deadline.
//! It can be built in code or loaded from a TOML or YAML file (see [`loader`]).

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::error::{WoolError, WoolResult};

pub mod loader;

pub use loader::{load_config, parse_config, ConfigFormat};

/// Buffer size of the job and result queues unless configured otherwise
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Order of the returned result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrder {
    /// Order in which the result sink received results (not input order)
    #[default]
    Arrival,
    /// Stable sort by the originating job index before returning
    Sequence,
}

/// Configuration of a worker pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of concurrent workers draining the job queue
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Capacity of the bounded job queue
    #[serde(default = "default_queue_capacity")]
    pub job_queue_capacity: usize,

    /// Capacity of the bounded result queue
    #[serde(default = "default_queue_capacity")]
    pub result_queue_capacity: usize,

    /// Order of the returned results
    #[serde(default)]
    pub order: ResultOrder,

    /// Deadline for a whole batch; `None` lets it run to completion
    #[serde(
        with = "humantime_serde",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            job_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            result_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            order: ResultOrder::default(),
            timeout: None,
        }
    }
}

impl PoolConfig {
    /// Configuration with the given worker count and default queues
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set both queue capacities at once
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.job_queue_capacity = capacity;
        self.result_queue_capacity = capacity;
        self
    }

    pub fn with_job_queue_capacity(mut self, capacity: usize) -> Self {
        self.job_queue_capacity = capacity;
        self
    }

    pub fn with_result_queue_capacity(mut self, capacity: usize) -> Self {
        self.result_queue_capacity = capacity;
        self
    }

    pub fn with_order(mut self, order: ResultOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check the caller contract before any task is started
    pub fn validate(&self) -> WoolResult<()> {
        if self.worker_count == 0 {
            return Err(WoolError::invalid_config(
                "worker_count",
                "must be at least 1",
            ));
        }
        for (field, capacity) in [
            ("job_queue_capacity", self.job_queue_capacity),
            ("result_queue_capacity", self.result_queue_capacity),
        ] {
            if capacity == 0 {
                return Err(WoolError::invalid_config(field, "must be at least 1"));
            }
            // tokio's bounded channel panics beyond this
            if capacity > Semaphore::MAX_PERMITS {
                return Err(WoolError::invalid_config(
                    field,
                    format!("must not exceed {}", Semaphore::MAX_PERMITS),
                ));
            }
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(WoolError::invalid_config(
                "timeout",
                "must be greater than zero when set",
            ));
        }
        Ok(())
    }
}
