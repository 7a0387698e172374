//! Scoring model configuration.
//!
//! Every weight and threshold in the pipeline lives here, with defaults
//! matching the published business rules. A JSON file can override the
//! defaults for what-if analysis; the file shape is this struct.

use crate::error::PipelineResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Static model-version tag stamped on every output record.
    pub model_version: String,

    // Recency windows
    pub recent_window_months:    u32,
    pub total_txn_window_months: u32,
    pub complaint_window_months: u32,

    /// Sentinel for "no transaction ever observed".
    pub dormancy_sentinel_days: i64,

    // Transaction trend ratio cut points (recent / prior)
    pub trend_increasing_ratio: f64,
    pub trend_stable_ratio:     f64,
    pub trend_declining_ratio:  f64,

    /// Relationship balance above which the coarse balance trend is stable.
    pub balance_trend_floor: f64,

    // Engagement score formula
    pub engagement_login_weight:    u32,
    pub engagement_mobile_bonus:    u32,
    pub engagement_online_bonus:    u32,
    pub engagement_feature_weight:  u32,

    // Flag thresholds
    pub low_total_balance:        f64,
    pub low_primary_balance:      f64,
    pub reduced_activity_ratio:   f64,
    pub low_engagement_logins:    u32,
    pub dormancy_days:            i64,
    pub repeat_complaint_count:   u32,

    // Score weights
    pub base_score:               i64,
    pub declining_balance_points: i64,
    pub reduced_activity_points:  i64,
    pub low_engagement_points:    i64,
    pub complaint_points:         i64,
    pub dormancy_points:          i64,

    // Protective subtractions
    pub product_depth_credit:     i64,
    pub product_depth_min:        u32,
    pub tenure_credit:            i64,
    pub tenure_credit_months:     i64,
    pub engagement_credit:        i64,
    pub engagement_credit_score:  u32,

    // Segment adjustment
    pub mass_market_adjustment:    i64,
    pub high_net_worth_adjustment: i64,

    // Tier cut points (upper bound of each tier, inclusive)
    pub low_tier_max:    i64,
    pub medium_tier_max: i64,
    pub high_tier_max:   i64,

    /// Primary-driver rule cut: dormancy wins outright past this many days.
    pub dormancy_driver_days: i64,

    /// Max age of the stamped timestamp before the output counts as stale.
    pub freshness_max_age_hours: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model_version: "churn-risk-v1.0.0".to_string(),

            recent_window_months:    3,
            total_txn_window_months: 6,
            complaint_window_months: 12,

            dormancy_sentinel_days: 999,

            trend_increasing_ratio: 1.10,
            trend_stable_ratio:     0.90,
            trend_declining_ratio:  0.50,

            balance_trend_floor: 1000.0,

            engagement_login_weight:   2,
            engagement_mobile_bonus:   20,
            engagement_online_bonus:   10,
            engagement_feature_weight: 2,

            low_total_balance:      500.0,
            low_primary_balance:    100.0,
            reduced_activity_ratio: 0.70,
            low_engagement_logins:  3,
            dormancy_days:          45,
            repeat_complaint_count: 2,

            base_score:               20,
            declining_balance_points: 20,
            reduced_activity_points:  20,
            low_engagement_points:    15,
            complaint_points:         15,
            dormancy_points:          25,

            product_depth_credit:    10,
            product_depth_min:       3,
            tenure_credit:           10,
            tenure_credit_months:    60,
            engagement_credit:       10,
            engagement_credit_score: 70,

            mass_market_adjustment:    5,
            high_net_worth_adjustment: -5,

            low_tier_max:    25,
            medium_tier_max: 50,
            high_tier_max:   75,

            dormancy_driver_days: 60,

            freshness_max_age_hours: 25,
        }
    }
}

impl ScoringConfig {
    /// Load a config override file. Fields absent from the file keep
    /// their defaults.
    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        log::info!("Loaded scoring config from {} (model {})", path.display(), config.model_version);
        Ok(config)
    }
}
