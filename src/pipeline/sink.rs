//! Result sink: the single consumer of the result queue

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::ExecutionContext;
use crate::error::WoolResult;
use crate::transform::{run_result_transform, ResultTransform};
use crate::types::{JobResult, ResultList};

/// Drain the result queue, keeping results the result transform leaves active
///
/// Runs until the queue is closed and empty, in arrival order. Cancellation
/// does not stop the sink: whatever the workers still deliver is processed.
/// Being the only consumer, it owns the output list outright.
pub async fn process_results<R>(
    mut result_rx: mpsc::Receiver<JobResult>,
    transform: Arc<R>,
    ctx: ExecutionContext,
) -> WoolResult<ResultList>
where
    R: ResultTransform,
{
    let mut output = ResultList::new();

    while let Some(result) = result_rx.recv().await {
        let index = result.index();
        let result = match run_result_transform(&transform, result).await {
            Ok(result) => result,
            Err(e) => {
                ctx.cancel();
                return Err(e);
            }
        };

        let kept = result.is_active();
        ctx.collector().result_processed(kept);
        if kept {
            output.push(result);
        } else {
            trace!("Result for job {} dropped by result transform", index);
        }
    }

    debug!(
        "Result sink of execution {} collected {} results",
        ctx.id(),
        output.len()
    );
    Ok(output)
}
