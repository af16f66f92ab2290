//! Common test utilities and helpers
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wool::{Job, JobResult, Record, ValueMap};

/// Astronomical units per light year
pub const AU_PER_LIGHT_YEAR: f64 = 63241.0;

/// Solar system sample table: name, class, distance in AU
pub const SOLAR_SYSTEM: &[(&str, &str, f64)] = &[
    ("Mercury", "planet", 0.4),
    ("Venus", "planet", 0.7),
    ("Earth", "planet", 1.0),
    ("Mars", "planet", 1.5),
    ("Asteroid belt", "area", 2.3),
    ("Jupiter", "planet", 5.2),
    ("Saturn", "planet", 9.5),
    ("Uranus", "planet", 19.2),
    ("Neptune", "planet", 30.1),
    ("Kuiper belt", "area", 30.0),
    ("Heliosphere", "area", 123.0),
    ("Oort Cloud", "area", 50000.0),
];

/// Inner planets that survive both stages, with their expected distance in light years
pub const INNER_PLANETS: &[(&str, &str)] = &[
    ("Mercury", "0.000006"),
    ("Venus", "0.000011"),
    ("Earth", "0.000016"),
    ("Mars", "0.000024"),
];

pub fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Records for the solar system table, distances formatted with two decimals
pub fn solar_system_records() -> Vec<Record> {
    SOLAR_SYSTEM
        .iter()
        .map(|(name, class, dist_au)| {
            let dist_au = format!("{dist_au:.2}");
            record(&[("name", *name), ("class", *class), ("distAu", dist_au.as_str())])
        })
        .collect()
}

/// Computes `distLy` for planets and drops everything else
pub fn light_years(job: Job) -> JobResult {
    let mut job = job;
    let mut values = ValueMap::new();
    if job.get("class") == Some("planet") {
        let dist_au: f64 = job.get("distAu").and_then(|d| d.parse().ok()).unwrap_or(0.0);
        values.insert(
            "distLy".to_string(),
            format!("{:.6}", dist_au / AU_PER_LIGHT_YEAR),
        );
    } else {
        job.deactivate();
    }
    job.into_result(values)
}

/// Keeps only bodies of the inner solar system
pub fn inner_system_only(result: JobResult) -> JobResult {
    let mut result = result;
    let dist_au: f64 = result
        .job
        .get("distAu")
        .and_then(|d| d.parse().ok())
        .unwrap_or(0.0);
    if dist_au > 2.0 {
        result.deactivate();
    }
    result
}

/// `count` records carrying their own position as `n`
pub fn numbered_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| record(&[("n", i.to_string().as_str())]))
        .collect()
}

/// Value of `n` in a record built by [`numbered_records`]
pub fn n_of(job: &Job) -> usize {
    job.get("n").and_then(|n| n.parse().ok()).unwrap_or(usize::MAX)
}

/// Counts transform invocations across threads
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Install a test subscriber once; respects RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
