//! Job source: records in, jobs out

use tokio::sync::mpsc;
use tracing::debug;

use super::ExecutionContext;
use crate::types::{Job, Record};

/// Deliver one active job per record into the job queue, in input order
///
/// Jobs are indexed `0..N`. Awaits whenever the queue is full. Dropping
/// `job_tx` on return closes the queue. Returns early if the execution is
/// cancelled or no worker is left to receive. Returns the number of jobs
/// delivered.
pub async fn register_jobs(
    records: Vec<Record>,
    job_tx: mpsc::Sender<Job>,
    ctx: ExecutionContext,
) -> usize {
    let total = records.len();
    let mut submitted = 0;

    for (index, values) in records.into_iter().enumerate() {
        let job = Job::new(index, values);
        tokio::select! {
            biased;
            _ = ctx.token().cancelled() => {
                debug!(
                    "Execution {} cancelled, job source stopping after {}/{} jobs",
                    ctx.id(),
                    submitted,
                    total
                );
                break;
            }
            sent = job_tx.send(job) => {
                if sent.is_err() {
                    debug!(
                        "Job queue of execution {} closed by workers after {}/{} jobs",
                        ctx.id(),
                        submitted,
                        total
                    );
                    break;
                }
                submitted += 1;
                ctx.collector().job_submitted();
            }
        }
    }

    debug!("Job source of execution {} registered {} jobs", ctx.id(), submitted);
    submitted
}
