//! churnrisk-runner: headless demo runner for the churn-risk pipeline.
//!
//! Generates a deterministic synthetic banking dataset, scores it, and
//! persists the output set to SQLite.
//!
//! Usage:
//!   churnrisk-runner --seed 42 --customers 500 --as-of 2026-06-30 --db out.db
//!   churnrisk-runner --seed 42 --config scoring.json

mod gen;
mod names;
mod rng;
mod store;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use churnrisk_core::{config::ScoringConfig, pipeline, validate};
use rng::DataRng;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let customers = parse_arg(&args, "--customers", 500usize);
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or("churnrisk.db");

    let as_of = match args.windows(2).find(|w| w[0] == "--as-of") {
        Some(w) => NaiveDate::parse_from_str(&w[1], "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date '{}'", w[1]))?,
        None => Utc::now().date_naive(),
    };

    let cfg = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => ScoringConfig::from_file(Path::new(&w[1]))?,
        None => ScoringConfig::default(),
    };

    println!("churnrisk-runner");
    println!("  seed:      {seed}");
    println!("  customers: {customers}");
    println!("  as-of:     {as_of}");
    println!("  db:        {db}");
    println!("  model:     {}", cfg.model_version);
    println!();

    let mut rng = DataRng::new(seed);
    let sources = gen::generate(customers, as_of, &mut rng);
    log::info!(
        "generated {} customers, {} accounts, {} transactions, {} snapshots, {} complaints",
        sources.customers.len(),
        sources.accounts.len(),
        sources.transactions.len(),
        sources.engagement.len(),
        sources.complaints.len(),
    );

    let output = pipeline::run(&sources, as_of, &cfg)?;

    for rejection in &output.rejections {
        println!(
            "  REJECTED {:?} row {}: {}",
            rejection.entity, rejection.row_ref, rejection.reason
        );
    }

    let findings = validate::validate_output(&output.records, 1, Utc::now(), &cfg);
    for finding in &findings {
        println!("  QUALITY: {finding}");
    }

    let mut store = store::OutputStore::open(db)?;
    store.migrate()?;
    store.replace_output(&output)?;

    print_summary(&store, &output)?;
    Ok(())
}

fn print_summary(store: &store::OutputStore, output: &pipeline::PipelineOutput) -> Result<()> {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:     {}", output.run.run_id);
    println!("  records:    {}", store.record_count()?);
    println!("  rejections: {}", output.rejections.len());
    println!("  avg score:  {:.1}", store.average_score()?);

    println!();
    println!("=== TIER DISTRIBUTION ===");
    for (tier, count) in store.tier_distribution()? {
        println!("  {tier:<10} {count}");
    }

    println!();
    println!("=== RECOMMENDED INTERVENTIONS ===");
    for (intervention, count) in store.intervention_distribution()? {
        println!("  {intervention:<20} {count}");
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
