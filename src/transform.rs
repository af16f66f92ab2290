//! Caller-supplied transforms and the recovery boundary they run behind

use std::any::Any;
use std::sync::Arc;
use tracing::error;

use crate::error::{WoolError, WoolResult};
use crate::types::{Job, JobResult, Stage};

/// Stage one: turns a job into a result, clearing `active` to drop it
pub trait JobTransform: Send + Sync + 'static {
    fn apply(&self, job: Job) -> JobResult;
}

impl<F> JobTransform for F
where
    F: Fn(Job) -> JobResult + Send + Sync + 'static,
{
    fn apply(&self, job: Job) -> JobResult {
        self(job)
    }
}

/// Stage two: refines a result, clearing `job.active` to drop it
pub trait ResultTransform: Send + Sync + 'static {
    fn apply(&self, result: JobResult) -> JobResult;
}

impl<F> ResultTransform for F
where
    F: Fn(JobResult) -> JobResult + Send + Sync + 'static,
{
    fn apply(&self, result: JobResult) -> JobResult {
        self(result)
    }
}

/// Result transform that keeps every result unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ResultTransform for PassThrough {
    fn apply(&self, result: JobResult) -> JobResult {
        result
    }
}

/// Run the job transform on the blocking pool, converting a panic into an error
pub(crate) async fn run_job_transform<J: JobTransform>(
    transform: &Arc<J>,
    job: Job,
) -> WoolResult<JobResult> {
    let index = job.index;
    let transform = Arc::clone(transform);
    guarded(Stage::Job, index, move || transform.apply(job)).await
}

/// Run the result transform on the blocking pool, converting a panic into an error
pub(crate) async fn run_result_transform<R: ResultTransform>(
    transform: &Arc<R>,
    result: JobResult,
) -> WoolResult<JobResult> {
    let index = result.job.index;
    let transform = Arc::clone(transform);
    guarded(Stage::Result, index, move || transform.apply(result)).await
}

async fn guarded<F>(stage: Stage, index: usize, f: F) -> WoolResult<JobResult>
where
    F: FnOnce() -> JobResult + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => Ok(result),
        Err(e) if e.is_panic() => {
            let message = panic_message(e.into_panic());
            error!("{} transform panicked on job {}: {}", stage, index, message);
            Err(WoolError::TransformPanicked {
                stage,
                index,
                message,
            })
        }
        Err(e) => Err(WoolError::TaskFailed {
            unit: format!("{stage} transform for job {index}"),
            source: e,
        }),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
