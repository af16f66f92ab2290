//! # Wool
//!
//! A bounded worker pool that pushes a batch of records through two
//! caller-supplied transforms and collects what survives.
//!
//! ## Usage
//!
//! ```no_run
//! use wool::{work, Job, JobResult, ValueMap};
//!
//! # async fn demo(records: Vec<ValueMap>) -> wool::WoolResult<()> {
//! let results = work(
//!     4,
//!     records,
//!     |job: Job| {
//!         let mut values = ValueMap::new();
//!         values.insert("len".to_string(), job.values.len().to_string());
//!         job.into_result(values)
//!     },
//!     |result: JobResult| result,
//! )
//! .await?;
//! println!("{} results", results.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - `config` - Pool sizing, result order and batch deadline, loadable from TOML or YAML
//! - `error` - Error type and error codes
//! - `pipeline` - Job source, worker pool and result sink of one execution
//! - `pool` - Orchestrator and the `work` entry points
//! - `report` - Per-execution counters and timing
//! - `transform` - Transform traits and the panic recovery boundary
//! - `types` - Jobs, results and value maps
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pool;
pub mod report;
pub mod transform;
pub mod types;

pub use config::{load_config, PoolConfig, ResultOrder};
pub use error::{ErrorCode, WoolError, WoolResult};
pub use pool::{work, work_blocking, WorkerPool};
pub use report::{BatchReport, BatchStats};
pub use tokio_util::sync::CancellationToken;
pub use transform::{JobTransform, PassThrough, ResultTransform};
pub use types::{Job, JobResult, Record, ResultList, Stage, ValueMap};
