//! End-to-end runs over the solar system sample data

mod common;

use anyhow::Result;
use common::*;
use std::collections::HashMap;
use wool::{work, PoolConfig, ResultOrder, WorkerPool};

#[tokio::test]
async fn test_mercury_survives_and_asteroid_belt_is_dropped() -> Result<()> {
    init_tracing();
    let records = vec![
        record(&[("name", "Mercury"), ("class", "planet"), ("distAu", "0.40")]),
        record(&[("name", "AsteroidBelt"), ("class", "area"), ("distAu", "2.30")]),
    ];

    let results = work(2, records, light_years, inner_system_only).await?;

    assert_eq!(results.len(), 1);
    let mercury = &results[0];
    assert_eq!(mercury.job.get("name"), Some("Mercury"));
    assert_eq!(mercury.get("distLy"), Some("0.000006"));
    assert!(mercury.is_active());
    Ok(())
}

#[tokio::test]
async fn test_full_table_keeps_inner_planets() -> Result<()> {
    init_tracing();
    let results = work(10, solar_system_records(), light_years, inner_system_only).await?;

    let got: HashMap<String, String> = results
        .iter()
        .map(|r| {
            (
                r.job.get("name").unwrap_or_default().to_string(),
                r.get("distLy").unwrap_or_default().to_string(),
            )
        })
        .collect();
    let expected: HashMap<String, String> = INNER_PLANETS
        .iter()
        .map(|(name, ly)| (name.to_string(), ly.to_string()))
        .collect();

    assert_eq!(results.len(), INNER_PLANETS.len());
    assert_eq!(got, expected);
    Ok(())
}

#[tokio::test]
async fn test_report_counts_each_stage() -> Result<()> {
    let pool = WorkerPool::with_workers(3)?;
    let report = pool
        .run(solar_system_records(), light_years, inner_system_only)
        .await?;

    // 8 planets, 4 areas; 4 outer planets fail the distance check
    assert_eq!(report.stats.jobs_submitted, 12);
    assert_eq!(report.stats.jobs_processed, 12);
    assert_eq!(report.stats.jobs_filtered, 4);
    assert_eq!(report.stats.results_processed, 8);
    assert_eq!(report.stats.results_filtered, 4);
    assert_eq!(report.stats.results_emitted, 4);
    Ok(())
}

#[tokio::test]
async fn test_sequence_order_follows_table_order() -> Result<()> {
    let pool = WorkerPool::new(PoolConfig::new(6).with_order(ResultOrder::Sequence))?;
    let results = pool
        .execute(solar_system_records(), light_years, inner_system_only)
        .await?;

    let names: Vec<_> = results
        .iter()
        .filter_map(|r| r.job.get("name"))
        .collect();
    assert_eq!(names, vec!["Mercury", "Venus", "Earth", "Mars"]);
    Ok(())
}

#[test]
fn test_blocking_entry_point() -> Result<()> {
    let results = wool::work_blocking(4, solar_system_records(), light_years, inner_system_only)?;
    assert_eq!(results.len(), 4);
    Ok(())
}
