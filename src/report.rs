//! Execution reports and counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

use crate::types::JobResult;

/// Item counts for one execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Jobs delivered into the job queue by the source
    pub jobs_submitted: usize,
    /// Jobs the job transform ran on
    pub jobs_processed: usize,
    /// Jobs the job transform marked inactive
    pub jobs_filtered: usize,
    /// Results the result transform ran on
    pub results_processed: usize,
    /// Results the result transform marked inactive
    pub results_filtered: usize,
    /// Results appended to the output list
    pub results_emitted: usize,
}

impl BatchStats {
    /// Items dropped at either stage
    pub fn total_filtered(&self) -> usize {
        self.jobs_filtered + self.results_filtered
    }

    /// Whether every submitted job was accounted for by a transform
    pub fn is_complete(&self) -> bool {
        self.jobs_processed == self.jobs_submitted
            && self.jobs_filtered <= self.jobs_processed
            && self.results_processed == self.jobs_processed - self.jobs_filtered
    }
}

/// Lock-free counters shared by the tasks of one execution
#[derive(Debug, Default)]
pub(crate) struct StatsCollector {
    jobs_submitted: AtomicUsize,
    jobs_processed: AtomicUsize,
    jobs_filtered: AtomicUsize,
    results_processed: AtomicUsize,
    results_filtered: AtomicUsize,
}

impl StatsCollector {
    pub(crate) fn job_submitted(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn job_processed(&self, kept: bool) {
        self.jobs_processed.fetch_add(1, Ordering::Relaxed);
        if !kept {
            self.jobs_filtered.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn result_processed(&self, kept: bool) {
        self.results_processed.fetch_add(1, Ordering::Relaxed);
        if !kept {
            self.results_filtered.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Snapshot the counters; only meaningful once every task has finished
    pub(crate) fn snapshot(&self, results_emitted: usize) -> BatchStats {
        BatchStats {
            jobs_submitted: self.jobs_submitted.load(Ordering::Relaxed),
            jobs_processed: self.jobs_processed.load(Ordering::Relaxed),
            jobs_filtered: self.jobs_filtered.load(Ordering::Relaxed),
            results_processed: self.results_processed.load(Ordering::Relaxed),
            results_filtered: self.results_filtered.load(Ordering::Relaxed),
            results_emitted,
        }
    }
}

/// Outcome of one execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Identifier used in this execution's log lines
    pub execution_id: Uuid,
    /// Active results in the configured order
    pub results: Vec<JobResult>,
    pub stats: BatchStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Wall-clock time of the execution
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<JobResult> {
        self.results
    }
}
