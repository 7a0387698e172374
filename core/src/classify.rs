//! Classifier — primary risk driver, recommended intervention, priority.
//!
//! Both classifications are ordered rule chains evaluated top to bottom,
//! first match wins. The ordering is a deliberate tie-break policy: a
//! deeply dormant customer reads as DORMANCY even when four other flags
//! are also set. Rules are spelled out as explicit (predicate, outcome)
//! lists so the ordering survives refactors.

use crate::{aggregate::CustomerAggregates, config::ScoringConfig, flags::RiskFlags};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskDriver {
    Dormancy,
    BalanceDecline,
    ActivityReduction,
    Complaints,
    LowEngagement,
    MultiFactor,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intervention {
    UrgentEscalation,
    RelationshipCall,
    RetentionOffer,
    DigitalEngagement,
    BranchMeeting,
    NoAction,
}

/// The single named condition that best explains a customer's risk.
pub fn primary_driver(
    score: u8,
    flags: &RiskFlags,
    agg: &CustomerAggregates,
    cfg: &ScoringConfig,
) -> RiskDriver {
    let rules = [
        (
            flags.dormancy && agg.days_since_last_transaction > cfg.dormancy_driver_days,
            RiskDriver::Dormancy,
        ),
        (
            flags.declining_balance && agg.primary_account_balance < cfg.low_primary_balance,
            RiskDriver::BalanceDecline,
        ),
        (flags.reduced_activity, RiskDriver::ActivityReduction),
        (
            flags.complaint && agg.open_complaints_count > 0,
            RiskDriver::Complaints,
        ),
        (flags.low_engagement, RiskDriver::LowEngagement),
        (i64::from(score) > cfg.medium_tier_max, RiskDriver::MultiFactor),
    ];

    first_match(&rules, RiskDriver::None)
}

/// The retention action recommended for this score and flag mix.
pub fn intervention(score: u8, flags: &RiskFlags, cfg: &ScoringConfig) -> Intervention {
    let score = i64::from(score);
    let rules = [
        (score > cfg.high_tier_max, Intervention::UrgentEscalation),
        (score > cfg.medium_tier_max && flags.complaint, Intervention::RelationshipCall),
        (score > cfg.medium_tier_max, Intervention::RetentionOffer),
        (score > cfg.low_tier_max && flags.low_engagement, Intervention::DigitalEngagement),
        (score > cfg.low_tier_max, Intervention::BranchMeeting),
    ];

    first_match(&rules, Intervention::NoAction)
}

/// Intervention priority 1 (most urgent) to 4, on the same score
/// thresholds as the intervention chain.
pub fn priority(score: u8, cfg: &ScoringConfig) -> u8 {
    let score = i64::from(score);
    if score > cfg.high_tier_max {
        1
    } else if score > cfg.medium_tier_max {
        2
    } else if score > cfg.low_tier_max {
        3
    } else {
        4
    }
}

fn first_match<T: Copy>(rules: &[(bool, T)], fallback: T) -> T {
    rules
        .iter()
        .find(|(matched, _)| *matched)
        .map(|(_, outcome)| *outcome)
        .unwrap_or(fallback)
}
