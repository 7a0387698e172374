//! Pipeline orchestration.
//!
//! STAGE ORDER (fixed, documented, never reordered):
//!   1. Source filter      — eligibility + malformed-row rejection
//!   2. Aggregator         — per-customer summaries
//!   3. Flag evaluator     — five boolean risk drivers
//!   4. Score calculator   — composite score + tier
//!   5. Classifier         — primary driver, intervention, priority
//!
//! RULES:
//!   - Stages 2–5 are pure per-customer functions; no customer's result
//!     depends on another's. The fan-out across customers runs on the
//!     rayon pool with the filtered sources shared immutably.
//!   - A malformed row is skipped and reported, never a batch abort.
//!   - Identical inputs and as-of date reproduce identical records,
//!     except the stamped calculation timestamp.

use crate::{
    aggregate,
    classify,
    config::ScoringConfig,
    error::PipelineResult,
    filter::{self, FilteredSources, RowRejection},
    flags,
    model::{Customer, SourceData},
    record::{self, ChurnRiskRecord},
    score,
    types::RunId,
};
use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde::Serialize;

/// Run-level metadata stamped on the report, not on individual records.
#[derive(Debug, Clone, Serialize)]
pub struct RunInfo {
    pub run_id:             RunId,
    pub as_of:              NaiveDate,
    pub calculated_at:      DateTime<Utc>,
    pub model_version:      String,
    pub eligible_customers: usize,
    pub rejected_rows:      usize,
}

/// The full result of one pipeline run: the replacement output set plus
/// the per-row rejections the caller must surface.
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub run:        RunInfo,
    pub records:    Vec<ChurnRiskRecord>,
    pub rejections: Vec<RowRejection>,
}

/// Execute the whole pipeline for one as-of date.
///
/// Produces exactly one record per eligible (verified) customer, in
/// stable `customer_id` order. An empty eligible set is not an error;
/// it yields an empty output set and a warning.
pub fn run(
    sources: &SourceData,
    as_of: NaiveDate,
    cfg: &ScoringConfig,
) -> PipelineResult<PipelineOutput> {
    let calculated_at = Utc::now();
    run_at(sources, as_of, calculated_at, cfg)
}

/// As [`run`], with the calculation timestamp supplied by the caller.
/// Lets replays and tests pin the one non-deterministic output field.
pub fn run_at(
    sources: &SourceData,
    as_of: NaiveDate,
    calculated_at: DateTime<Utc>,
    cfg: &ScoringConfig,
) -> PipelineResult<PipelineOutput> {
    let run_id = uuid::Uuid::new_v4().to_string();
    log::info!(
        "run {run_id}: scoring {} customers as of {as_of} (model {})",
        sources.customers.len(),
        cfg.model_version,
    );

    let (filtered, rejections) = filter::filter_sources(sources, as_of, cfg)?;

    for rejection in &rejections {
        log::warn!(
            "run {run_id}: rejected {:?} row {}: {}",
            rejection.entity,
            rejection.row_ref,
            rejection.reason,
        );
    }

    if filtered.customers.is_empty() {
        log::warn!("run {run_id}: zero eligible customers; emitting empty output set");
    }

    let records: Vec<ChurnRiskRecord> = filtered
        .customers
        .par_iter()
        .map(|customer| score_customer(customer, &filtered, as_of, calculated_at, cfg))
        .collect::<PipelineResult<_>>()?;

    log::info!(
        "run {run_id}: {} records, {} rejections",
        records.len(),
        rejections.len(),
    );

    Ok(PipelineOutput {
        run: RunInfo {
            run_id,
            as_of,
            calculated_at,
            model_version: cfg.model_version.clone(),
            eligible_customers: records.len(),
            rejected_rows: rejections.len(),
        },
        records,
        rejections,
    })
}

/// Score a single customer end to end. Pure given its inputs; safe to
/// call from any worker thread.
pub fn score_customer(
    customer: &Customer,
    filtered: &FilteredSources,
    as_of: NaiveDate,
    calculated_at: DateTime<Utc>,
    cfg: &ScoringConfig,
) -> PipelineResult<ChurnRiskRecord> {
    let id = customer.customer_id.as_str();

    let agg = aggregate::aggregate(
        customer,
        filtered.accounts(id),
        filtered.transactions(id),
        filtered.engagement(id),
        filtered.complaints(id),
        as_of,
        cfg,
    )?;

    let flags = flags::evaluate(&agg, cfg);
    let breakdown = score::compute_score(customer.segment, &agg, &flags, cfg);
    let tier = score::tier_for(breakdown.score, cfg);
    let driver = classify::primary_driver(breakdown.score, &flags, &agg, cfg);
    let intervention = classify::intervention(breakdown.score, &flags, cfg);
    let priority = classify::priority(breakdown.score, cfg);

    log::debug!(
        "customer {id}: score={} tier={tier:?} driver={driver:?} flags={}",
        breakdown.score,
        flags.count(),
    );

    Ok(record::assemble(
        customer,
        &agg,
        &flags,
        &breakdown,
        tier,
        driver,
        intervention,
        priority,
        calculated_at,
        &cfg.model_version,
    ))
}
