//! Output-quality checks over the assembled record set.
//!
//! The monitoring layer downstream owns scheduling these; they live here
//! so monitoring and the test suite share one definition of "healthy
//! output". A violation is a data-quality finding, not a pipeline error:
//! the run that produced it already completed.

use crate::{config::ScoringConfig, record::ChurnRiskRecord, score, types::CustomerId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QualityViolation {
    #[error("record {customer_id}: score {score} outside [0, 100]")]
    ScoreOutOfBounds { customer_id: CustomerId, score: u8 },

    #[error("record {customer_id}: tier does not match score {score}")]
    TierMismatch { customer_id: CustomerId, score: u8 },

    #[error("record {customer_id}: HIGH/CRITICAL tier with no risk flag set")]
    TierWithoutFlag { customer_id: CustomerId },

    #[error("record {customer_id}: URGENT_ESCALATION outside CRITICAL tier")]
    UngatedEscalation { customer_id: CustomerId },

    #[error("record {customer_id}: priority {priority} inconsistent with score {score}")]
    PriorityMismatch { customer_id: CustomerId, score: u8, priority: u8 },

    #[error("record at index {index}: empty identity column")]
    MissingIdentity { index: usize },

    #[error("duplicate customer identity {customer_id}")]
    DuplicateIdentity { customer_id: CustomerId },

    #[error("output has {rows} rows, below the minimum {min_rows}")]
    RowCountBelowMinimum { rows: usize, min_rows: usize },

    #[error("record {customer_id}: calculated_at is {age_hours}h old (max {max_hours}h)")]
    StaleTimestamp { customer_id: CustomerId, age_hours: i64, max_hours: i64 },
}

/// Evaluate every output invariant over a record set.
///
/// `now` anchors the freshness check so callers (and tests) control the
/// clock. Returns all findings; an empty vec means the set is healthy.
pub fn validate_output(
    records: &[ChurnRiskRecord],
    min_rows: usize,
    now: DateTime<Utc>,
    cfg: &ScoringConfig,
) -> Vec<QualityViolation> {
    let mut findings = Vec::new();

    if records.len() < min_rows {
        findings.push(QualityViolation::RowCountBelowMinimum {
            rows: records.len(),
            min_rows,
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let id = record.customer_id.clone();

        if record.customer_id.trim().is_empty() || record.customer_name.trim().is_empty() {
            findings.push(QualityViolation::MissingIdentity { index });
        } else if !seen.insert(record.customer_id.as_str()) {
            findings.push(QualityViolation::DuplicateIdentity { customer_id: id.clone() });
        }

        if record.churn_risk_score > 100 {
            findings.push(QualityViolation::ScoreOutOfBounds {
                customer_id: id.clone(),
                score: record.churn_risk_score,
            });
        }

        if record.risk_tier != score::tier_for(record.churn_risk_score, cfg) {
            findings.push(QualityViolation::TierMismatch {
                customer_id: id.clone(),
                score: record.churn_risk_score,
            });
        }

        let any_flag = record.declining_balance_flag
            || record.reduced_activity_flag
            || record.low_engagement_flag
            || record.complaint_flag
            || record.dormancy_flag;
        if record.risk_tier >= score::RiskTier::High && !any_flag {
            findings.push(QualityViolation::TierWithoutFlag { customer_id: id.clone() });
        }

        if record.recommended_intervention == crate::classify::Intervention::UrgentEscalation
            && record.risk_tier != score::RiskTier::Critical
        {
            findings.push(QualityViolation::UngatedEscalation { customer_id: id.clone() });
        }

        let expected_priority = crate::classify::priority(record.churn_risk_score, cfg);
        if record.intervention_priority != expected_priority {
            findings.push(QualityViolation::PriorityMismatch {
                customer_id: id.clone(),
                score: record.churn_risk_score,
                priority: record.intervention_priority,
            });
        }

        let age_hours = (now - record.calculated_at).num_hours();
        if age_hours > cfg.freshness_max_age_hours {
            findings.push(QualityViolation::StaleTimestamp {
                customer_id: id,
                age_hours,
                max_hours: cfg.freshness_max_age_hours,
            });
        }
    }

    findings
}
