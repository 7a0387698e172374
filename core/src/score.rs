//! Score and tier calculator.
//!
//! Composite score = base + flag additions − protective subtractions
//! + segment adjustment, clamped to [0, 100]. An out-of-range raw total
//! before clamping is expected and benign, never an error. The tier
//! mapping partitions [0, 100] into four closed intervals with no gap
//! or overlap.

use crate::{
    aggregate::CustomerAggregates,
    config::ScoringConfig,
    flags::RiskFlags,
    model::CustomerSegment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

/// Every additive and subtractive term of one customer's score, kept
/// for explainability. Flag terms are zero when the flag is off.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreBreakdown {
    pub base:                     i64,
    pub declining_balance_points: i64,
    pub reduced_activity_points:  i64,
    pub low_engagement_points:    i64,
    pub complaint_points:         i64,
    pub dormancy_points:          i64,
    pub product_depth_credit:     i64,
    pub tenure_credit:            i64,
    pub engagement_credit:        i64,
    pub segment_adjustment:       i64,
    /// Sum of all terms before clamping; may fall outside [0, 100].
    pub raw_total:                i64,
    /// The clamped composite score.
    pub score:                    u8,
}

/// Segment-level risk adjustment: mass-market relationships churn more
/// readily, high-net-worth ones less.
pub fn segment_adjustment(segment: CustomerSegment, cfg: &ScoringConfig) -> i64 {
    match segment {
        CustomerSegment::MassMarket => cfg.mass_market_adjustment,
        CustomerSegment::HighNetWorth => cfg.high_net_worth_adjustment,
        CustomerSegment::MassAffluent | CustomerSegment::Affluent => 0,
    }
}

/// Combine flags, protective aggregates and segment into the composite
/// score.
pub fn compute_score(
    segment: CustomerSegment,
    agg: &CustomerAggregates,
    flags: &RiskFlags,
    cfg: &ScoringConfig,
) -> ScoreBreakdown {
    let flag_points = |on: bool, points: i64| if on { points } else { 0 };

    let declining_balance_points = flag_points(flags.declining_balance, cfg.declining_balance_points);
    let reduced_activity_points = flag_points(flags.reduced_activity, cfg.reduced_activity_points);
    let low_engagement_points = flag_points(flags.low_engagement, cfg.low_engagement_points);
    let complaint_points = flag_points(flags.complaint, cfg.complaint_points);
    let dormancy_points = flag_points(flags.dormancy, cfg.dormancy_points);

    let product_depth_credit =
        flag_points(agg.total_products_held >= cfg.product_depth_min, -cfg.product_depth_credit);
    let tenure_credit =
        flag_points(agg.relationship_tenure_months > cfg.tenure_credit_months, -cfg.tenure_credit);
    let engagement_credit =
        flag_points(agg.digital_engagement_score > cfg.engagement_credit_score, -cfg.engagement_credit);

    let segment_adjustment = segment_adjustment(segment, cfg);

    let raw_total = cfg.base_score
        + declining_balance_points
        + reduced_activity_points
        + low_engagement_points
        + complaint_points
        + dormancy_points
        + product_depth_credit
        + tenure_credit
        + engagement_credit
        + segment_adjustment;

    let score = raw_total.clamp(0, 100) as u8;

    ScoreBreakdown {
        base: cfg.base_score,
        declining_balance_points,
        reduced_activity_points,
        low_engagement_points,
        complaint_points,
        dormancy_points,
        product_depth_credit,
        tenure_credit,
        engagement_credit,
        segment_adjustment,
        raw_total,
        score,
    }
}

/// Map a clamped score to its tier. Closed upper bounds: 25 is LOW,
/// 26 is MEDIUM, and so on up to 100 = CRITICAL.
pub fn tier_for(score: u8, cfg: &ScoringConfig) -> RiskTier {
    let score = i64::from(score);
    if score <= cfg.low_tier_max {
        RiskTier::Low
    } else if score <= cfg.medium_tier_max {
        RiskTier::Medium
    } else if score <= cfg.high_tier_max {
        RiskTier::High
    } else {
        RiskTier::Critical
    }
}
