//! The three concurrent units of an execution and the context they share
//!
//! Every execution gets its own [`Execution`]: a bounded job queue, a bounded
//! result queue, a cancellation token and a set of counters. Nothing here is
//! process-wide, so any number of executions may overlap.
//!
//! - [`source`] feeds records into the job queue and closes it
//! - [`worker`] runs the job transform on a fixed number of workers
//! - [`sink`] runs the result transform and owns the output list

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::PoolConfig;
use crate::report::{BatchStats, StatsCollector};
use crate::types::{Job, JobResult};

pub mod sink;
pub mod source;
pub mod worker;

pub use sink::process_results;
pub use source::register_jobs;
pub use worker::launch_worker_pool;

/// State shared by the source, the workers and the sink of one execution
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    id: Uuid,
    cancel: CancellationToken,
    stats: Arc<StatsCollector>,
}

impl ExecutionContext {
    /// Context with a fresh id and its own cancellation token
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// Context driven by an existing token
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            cancel,
            stats: Arc::new(StatsCollector::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Ask every unit of the execution to stop taking new work
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Counters so far; final once every unit has finished
    pub fn stats(&self, results_emitted: usize) -> BatchStats {
        self.stats.snapshot(results_emitted)
    }

    pub(crate) fn collector(&self) -> &StatsCollector {
        &self.stats
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Queues and context owned by a single execution
pub struct Execution {
    pub context: ExecutionContext,
    pub job_tx: mpsc::Sender<Job>,
    pub job_rx: mpsc::Receiver<Job>,
    pub result_tx: mpsc::Sender<JobResult>,
    pub result_rx: mpsc::Receiver<JobResult>,
}

impl Execution {
    /// Allocate queues sized by `config`; the config must already be validated
    pub fn new(config: &PoolConfig, cancel: CancellationToken) -> Self {
        let (job_tx, job_rx) = mpsc::channel(config.job_queue_capacity);
        let (result_tx, result_rx) = mpsc::channel(config.result_queue_capacity);
        Self {
            context: ExecutionContext::with_token(cancel),
            job_tx,
            job_rx,
            result_tx,
            result_rx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_are_isolated() {
        let a = ExecutionContext::new();
        let b = ExecutionContext::new();
        assert_ne!(a.id(), b.id());

        a.cancel();
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
    }

    #[test]
    fn test_clones_share_token_and_counters() {
        let ctx = ExecutionContext::new();
        let clone = ctx.clone();
        clone.collector().job_submitted();
        clone.cancel();

        assert!(ctx.is_cancelled());
        assert_eq!(ctx.stats(0).jobs_submitted, 1);
    }

    #[test]
    fn test_child_token_cancellation() {
        let parent = CancellationToken::new();
        let ctx = ExecutionContext::with_token(parent.child_token());
        parent.cancel();
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_execution_queue_capacity() {
        let config = PoolConfig::new(1).with_queue_capacity(2);
        let execution = Execution::new(&config, CancellationToken::new());
        assert_eq!(execution.job_tx.capacity(), 2);
        assert_eq!(execution.result_tx.capacity(), 2);
    }
}
