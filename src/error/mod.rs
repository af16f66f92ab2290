use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::report::BatchReport;
use crate::types::{JobResult, Stage};

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// Result alias used throughout the crate
pub type WoolResult<T> = Result<T, WoolError>;

/// Errors surfaced by a pool execution
///
/// Filtering an item out is never an error, and neither is waiting on a full
/// or empty queue. Only contract violations, transform faults and interrupted
/// executions end up here.
#[derive(Error, Debug)]
pub enum WoolError {
    #[error("[E{:04}] Invalid pool configuration `{field}`: {reason}", ErrorCode::CONFIG_INVALID_VALUE)]
    InvalidConfiguration { field: String, reason: String },

    #[error("[E{code:04}] Failed to load pool configuration from {}: {reason}", .path.display())]
    ConfigLoad {
        code: u16,
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{:04}] {stage} transform panicked on job {index}: {message}", ErrorCode::EXEC_TRANSFORM_PANICKED)]
    TransformPanicked {
        stage: Stage,
        index: usize,
        message: String,
    },

    #[error(
        "[E{:04}] Execution cancelled with {} results collected",
        ErrorCode::EXEC_INTERRUPTED,
        .partial.results.len()
    )]
    Cancelled { partial: Box<BatchReport> },

    #[error(
        "[E{:04}] Execution exceeded its deadline of {limit:?} with {} results collected",
        ErrorCode::EXEC_TIMEOUT,
        .partial.results.len()
    )]
    TimedOut {
        limit: Duration,
        partial: Box<BatchReport>,
    },

    #[error("[E{:04}] {unit} task terminated abnormally", ErrorCode::EXEC_TASK_FAILED)]
    TaskFailed {
        unit: String,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("[E{:04}] Failed to start the async runtime", ErrorCode::EXEC_SPAWN_FAILED)]
    Runtime {
        #[source]
        source: std::io::Error,
    },
}

impl WoolError {
    /// Create a configuration validation error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration loading error with a specific code
    pub fn config_load(code: u16, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            code,
            path: path.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Attach an underlying cause to a configuration loading error
    pub fn with_source(
        mut self,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        if let Self::ConfigLoad { source, .. } = &mut self {
            *source = Some(cause.into());
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidConfiguration { .. } => ErrorCode::CONFIG_INVALID_VALUE,
            Self::ConfigLoad { code, .. } => *code,
            Self::TransformPanicked { .. } => ErrorCode::EXEC_TRANSFORM_PANICKED,
            Self::Cancelled { .. } => ErrorCode::EXEC_INTERRUPTED,
            Self::TimedOut { .. } => ErrorCode::EXEC_TIMEOUT,
            Self::TaskFailed { .. } => ErrorCode::EXEC_TASK_FAILED,
            Self::Runtime { .. } => ErrorCode::EXEC_SPAWN_FAILED,
        }
    }

    /// Whether the error was raised before any pipeline task started
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. } | Self::ConfigLoad { .. }
        )
    }

    /// Results collected before the execution was interrupted, if any
    pub fn partial_results(&self) -> Option<&[JobResult]> {
        match self {
            Self::Cancelled { partial } | Self::TimedOut { partial, .. } => {
                Some(&partial.results)
            }
            _ => None,
        }
    }

    /// Consume the error and return the partial report it carries
    pub fn into_partial(self) -> Option<BatchReport> {
        match self {
            Self::Cancelled { partial } | Self::TimedOut { partial, .. } => Some(*partial),
            _ => None,
        }
    }
}
