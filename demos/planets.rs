//! Converts the distance of every planet in the solar system to light years
//! and keeps the ones closer than 2 AU.
//!
//! ```text
//! cargo run --example planets -- -v --workers 4
//! cargo run --example planets -- --config pool.toml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use wool::{Job, JobResult, PoolConfig, ResultOrder, ValueMap, WorkerPool};

const AU_PER_LIGHT_YEAR: f64 = 63241.0;

const SOLAR_SYSTEM: &[(&str, &str, f64)] = &[
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

#[derive(Parser)]
#[command(name = "planets", about = "Run the solar system table through a worker pool")]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of workers, ignored when --config is given
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// Pool configuration file (TOML or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results in table order instead of arrival order
    #[arg(long)]
    sorted: bool,
}

fn distance_au(job: &Job) -> f64 {
    job.get("distAu").and_then(|d| d.parse().ok()).unwrap_or(0.0)
}

fn to_light_years(job: Job) -> JobResult {
    let mut job = job;
    let mut values = ValueMap::new();
    if job.get("class") == Some("planet") {
        values.insert(
            "distLy".to_string(),
            format!("{:.6}", distance_au(&job) / AU_PER_LIGHT_YEAR),
        );
    } else {
        job.deactivate();
    }
    job.into_result(values)
}

fn inner_system(result: JobResult) -> JobResult {
    let mut result = result;
    if distance_au(&result.job) > 2.0 {
        result.deactivate();
    }
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .init();

    let mut config = match &cli.config {
        Some(path) => wool::load_config(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => PoolConfig::new(cli.workers),
    };
    if cli.sorted {
        config = config.with_order(ResultOrder::Sequence);
    }
    debug!("Pool configuration: {:?}", config);

    let records = SOLAR_SYSTEM.iter().map(|(name, class, dist_au)| {
        let mut values = ValueMap::new();
        values.insert("name".to_string(), name.to_string());
        values.insert("class".to_string(), class.to_string());
        values.insert("distAu".to_string(), format!("{dist_au:.2}"));
        values
    });

    let report = WorkerPool::new(config)?
        .run(records, to_light_years, inner_system)
        .await?;

    println!("{}", serde_json::to_string_pretty(&report.results)?);
    println!(
        "{} of {} bodies kept in {:?}",
        report.stats.results_emitted, report.stats.jobs_submitted, report.elapsed
    );
    Ok(())
}
