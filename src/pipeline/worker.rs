//! Worker pool: a fixed set of workers draining the job queue
//!
//! Workers share the single job receiver behind an async mutex, so jobs leave
//! the queue in FIFO order but go to whichever worker is free. Only results
//! the job transform left active are forwarded to the result queue.
//!
//! The result queue must not close while any worker can still send into it,
//! otherwise the sink would stop early and silently lose in-flight results.
//! [`launch_worker_pool`] therefore joins every worker before it drops its
//! own sender.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, trace};

use super::ExecutionContext;
use crate::error::{WoolError, WoolResult};
use crate::transform::{run_job_transform, JobTransform};
use crate::types::{Job, JobResult};

/// Receiver shared by every worker of a pool
pub type SharedReceiver<T> = Arc<Mutex<mpsc::Receiver<T>>>;

/// Start `worker_count` workers and wait for all of them, then close the result queue
///
/// Returns the first error raised by a worker; a failing worker cancels the
/// execution so the remaining units wind down.
pub async fn launch_worker_pool<J>(
    worker_count: usize,
    job_rx: mpsc::Receiver<Job>,
    result_tx: mpsc::Sender<JobResult>,
    transform: Arc<J>,
    ctx: ExecutionContext,
) -> WoolResult<()>
where
    J: JobTransform,
{
    let jobs: SharedReceiver<Job> = Arc::new(Mutex::new(job_rx));
    let mut handles = Vec::with_capacity(worker_count);

    for worker_id in 0..worker_count {
        handles.push(tokio::spawn(worker(
            worker_id,
            Arc::clone(&jobs),
            result_tx.clone(),
            Arc::clone(&transform),
            ctx.clone(),
        )));
    }
    drop(jobs);

    debug!("Execution {} started {} workers", ctx.id(), worker_count);

    let mut first_error = None;
    for (worker_id, handle) in handles.into_iter().enumerate() {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                ctx.cancel();
                Err(WoolError::TaskFailed {
                    unit: format!("worker {worker_id}"),
                    source: e,
                })
            }
        };
        if let Err(e) = outcome {
            first_error.get_or_insert(e);
        }
    }

    // Every worker has been joined; closing the result queue is now safe.
    drop(result_tx);

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn worker<J>(
    worker_id: usize,
    jobs: SharedReceiver<Job>,
    results: mpsc::Sender<JobResult>,
    transform: Arc<J>,
    ctx: ExecutionContext,
) -> WoolResult<usize>
where
    J: JobTransform,
{
    let mut processed = 0;

    loop {
        let job = tokio::select! {
            biased;
            _ = ctx.token().cancelled() => {
                debug!("Worker {} of execution {} stopping: cancelled", worker_id, ctx.id());
                break;
            }
            job = async { jobs.lock().await.recv().await } => match job {
                Some(job) => job,
                None => break,
            },
        };

        let index = job.index;
        let result = match run_job_transform(&transform, job).await {
            Ok(result) => result,
            Err(e) => {
                ctx.cancel();
                return Err(e);
            }
        };
        processed += 1;

        let kept = result.is_active();
        ctx.collector().job_processed(kept);
        if !kept {
            trace!("Job {} dropped by job transform", index);
            continue;
        }

        if results.send(result).await.is_err() {
            debug!(
                "Worker {} of execution {} stopping: result queue closed",
                worker_id,
                ctx.id()
            );
            break;
        }
    }

    debug!("Worker {} finished after {} jobs", worker_id, processed);
    Ok(processed)
}
