//! Core data types flowing through the pipeline
//!
//! A batch of [`Record`]s becomes a stream of [`Job`]s, the job transform turns
//! each job into a [`JobResult`], and the result transform refines those
//! results. Both stages filter by flipping the embedded job's `active` flag.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// String key/value pairs attached to jobs and results
pub type ValueMap = HashMap<String, String>;

/// One input record of a batch
pub type Record = ValueMap;

/// Output of an execution, in the order the result sink processed it
pub type ResultList = Vec<JobResult>;

/// One unit of work derived from an input record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Position of the originating record in the batch
    pub index: usize,
    /// Cleared by a transform to drop the item from the pipeline
    #[serde(default = "default_active")]
    pub active: bool,
    /// Values copied verbatim from the record
    #[serde(default)]
    pub values: ValueMap,
}

fn default_active() -> bool {
    true
}

impl Job {
    /// Create an active job for the record at `index`
    pub fn new(index: usize, values: ValueMap) -> Self {
        Self {
            index,
            active: true,
            values,
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Mark the job as discarded
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Wrap the job into a result with the given values
    pub fn into_result(self, values: ValueMap) -> JobResult {
        JobResult { job: self, values }
    }

    /// Wrap the job into a discarded result with no values
    pub fn discard(mut self) -> JobResult {
        self.active = false;
        JobResult {
            job: self,
            values: ValueMap::new(),
        }
    }
}

/// Output of the job transform for a single job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    /// The originating job, including its possibly updated active flag
    pub job: Job,
    /// Values produced by the job transform
    #[serde(default)]
    pub values: ValueMap,
}

impl JobResult {
    /// Whether the result is still part of the pipeline
    pub fn is_active(&self) -> bool {
        self.job.active
    }

    /// Index of the originating record
    pub fn index(&self) -> usize {
        self.job.index
    }

    /// Look up a produced value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Mark the result as discarded
    pub fn deactivate(&mut self) {
        self.job.active = false;
    }
}

/// Pipeline stage a transform runs at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// The per-job transform run by the workers
    Job,
    /// The per-result transform run by the result sink
    Result,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Job => write!(f, "job"),
            Stage::Result => write!(f, "result"),
        }
    }
}
