//! Orchestrator: wires a job source, a worker pool and a result sink together
//!
//! Each call builds a fresh [`Execution`], starts the source and the sink as
//! tasks, runs the worker pool in the calling task until every worker has been
//! joined (which closes the result queue), then waits for the sink. The call
//! returns only once no job or result is left in flight.

use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{PoolConfig, ResultOrder};
use crate::error::{WoolError, WoolResult};
use crate::pipeline::{
    launch_worker_pool, process_results, register_jobs, Execution, ExecutionContext,
};
use crate::report::BatchReport;
use crate::transform::{JobTransform, ResultTransform};
use crate::types::{JobResult, Record, ResultList};

/// A validated pool configuration that can run any number of batches
///
/// Executions share nothing but the configuration, so one pool can serve
/// overlapping calls.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    config: PoolConfig,
}

impl WorkerPool {
    /// Validate `config` and build a pool from it
    pub fn new(config: PoolConfig) -> WoolResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Pool with `worker_count` workers and default queues
    pub fn with_workers(worker_count: usize) -> WoolResult<Self> {
        Self::new(PoolConfig::new(worker_count))
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Run a batch and return the active results
    pub async fn execute<I, J, R>(
        &self,
        records: I,
        job_transform: J,
        result_transform: R,
    ) -> WoolResult<ResultList>
    where
        I: IntoIterator<Item = Record>,
        J: JobTransform,
        R: ResultTransform,
    {
        self.run(records, job_transform, result_transform)
            .await
            .map(BatchReport::into_results)
    }

    /// Like [`WorkerPool::execute`], for callers outside an async runtime
    pub fn execute_blocking<I, J, R>(
        &self,
        records: I,
        job_transform: J,
        result_transform: R,
    ) -> WoolResult<ResultList>
    where
        I: IntoIterator<Item = Record>,
        J: JobTransform,
        R: ResultTransform,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|source| WoolError::Runtime { source })?;
        runtime.block_on(self.execute(records, job_transform, result_transform))
    }

    /// Run a batch and return the results together with counters and timing
    pub async fn run<I, J, R>(
        &self,
        records: I,
        job_transform: J,
        result_transform: R,
    ) -> WoolResult<BatchReport>
    where
        I: IntoIterator<Item = Record>,
        J: JobTransform,
        R: ResultTransform,
    {
        self.run_with_cancellation(
            records,
            job_transform,
            result_transform,
            CancellationToken::new(),
        )
        .await
    }

    /// Run a batch that stops early when `cancel` fires
    ///
    /// On cancellation (or when the configured deadline elapses) the source
    /// stops emitting, workers finish the job they hold, the sink drains what
    /// was already delivered, and the partial report comes back inside
    /// [`WoolError::Cancelled`] or [`WoolError::TimedOut`]. Cancelling `cancel`
    /// affects this execution only through a child token, so a failing batch
    /// never cancels the caller's token.
    pub async fn run_with_cancellation<I, J, R>(
        &self,
        records: I,
        job_transform: J,
        result_transform: R,
        cancel: CancellationToken,
    ) -> WoolResult<BatchReport>
    where
        I: IntoIterator<Item = Record>,
        J: JobTransform,
        R: ResultTransform,
    {
        let records: Vec<Record> = records.into_iter().collect();
        let total = records.len();
        let started_at = Utc::now();
        let start = Instant::now();

        let Execution {
            context: ctx,
            job_tx,
            job_rx,
            result_tx,
            result_rx,
        } = Execution::new(&self.config, cancel.child_token());

        info!(
            "Execution {} starting: {} records, {} workers",
            ctx.id(),
            total,
            self.config.worker_count
        );

        // Stops the detached units if the caller drops this future mid-batch.
        let abandon = ctx.token().clone().drop_guard();

        let deadline = self
            .config
            .timeout
            .map(|limit| spawn_deadline(limit, ctx.clone()));

        let source = tokio::spawn(register_jobs(records, job_tx, ctx.clone()));
        let sink = tokio::spawn(process_results(
            result_rx,
            Arc::new(result_transform),
            ctx.clone(),
        ));

        let pool_outcome = launch_worker_pool(
            self.config.worker_count,
            job_rx,
            result_tx,
            Arc::new(job_transform),
            ctx.clone(),
        )
        .await;

        let sink_outcome = match sink.await {
            Ok(outcome) => outcome,
            Err(source) => Err(WoolError::TaskFailed {
                unit: "result sink".to_string(),
                source,
            }),
        };
        let source_outcome = source.await.map_err(|source| WoolError::TaskFailed {
            unit: "job source".to_string(),
            source,
        });

        let timed_out = match deadline {
            Some(handle) if ctx.is_cancelled() => handle.await.unwrap_or(false),
            Some(handle) => {
                handle.abort();
                false
            }
            None => false,
        };
        abandon.disarm();

        pool_outcome?;
        let mut results = sink_outcome?;
        source_outcome?;

        if self.config.order == ResultOrder::Sequence {
            results.sort_by_key(JobResult::index);
        }

        let report = BatchReport {
            execution_id: ctx.id(),
            stats: ctx.stats(results.len()),
            results,
            started_at,
            finished_at: Utc::now(),
            elapsed: start.elapsed(),
        };

        // A token that fired after every job was processed lost nothing.
        if ctx.is_cancelled() && report.stats.jobs_processed < total {
            warn!(
                "Execution {} interrupted after {}/{} jobs, returning {} partial results",
                ctx.id(),
                report.stats.jobs_processed,
                total,
                report.results.len()
            );
            let partial = Box::new(report);
            return Err(match self.config.timeout {
                Some(limit) if timed_out => WoolError::TimedOut { limit, partial },
                _ => WoolError::Cancelled { partial },
            });
        }

        info!(
            "Execution {} finished in {:?}: {} of {} records kept ({} dropped by job transform, {} by result transform)",
            ctx.id(),
            report.elapsed,
            report.results.len(),
            total,
            report.stats.jobs_filtered,
            report.stats.results_filtered
        );
        Ok(report)
    }
}

/// Cancel the execution once `limit` elapses; yields whether it fired
fn spawn_deadline(limit: Duration, ctx: ExecutionContext) -> JoinHandle<bool> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(limit) => {
                warn!("Execution {} exceeded its deadline of {:?}", ctx.id(), limit);
                ctx.cancel();
                true
            }
            _ = ctx.token().cancelled() => false,
        }
    })
}

/// Run `records` through `worker_count` workers and the two transforms
///
/// The async entry point: validates the worker count, executes the batch and
/// returns the active results in arrival order.
pub async fn work<I, J, R>(
    worker_count: usize,
    records: I,
    job_transform: J,
    result_transform: R,
) -> WoolResult<ResultList>
where
    I: IntoIterator<Item = Record>,
    J: JobTransform,
    R: ResultTransform,
{
    WorkerPool::with_workers(worker_count)?
        .execute(records, job_transform, result_transform)
        .await
}

/// Blocking variant of [`work`]; starts its own multi-threaded runtime
///
/// Must not be called from inside an async runtime.
pub fn work_blocking<I, J, R>(
    worker_count: usize,
    records: I,
    job_transform: J,
    result_transform: R,
) -> WoolResult<ResultList>
where
    I: IntoIterator<Item = Record>,
    J: JobTransform,
    R: ResultTransform,
{
    WorkerPool::with_workers(worker_count)?.execute_blocking(
        records,
        job_transform,
        result_transform,
    )
}
