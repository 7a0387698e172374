//! Flag evaluator — the five boolean risk drivers.
//!
//! Each predicate is independent and order-free; all five are pure
//! functions of already-computed aggregates, no further I/O.

use crate::{aggregate::CustomerAggregates, config::ScoringConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlags {
    pub declining_balance: bool,
    pub reduced_activity:  bool,
    pub low_engagement:    bool,
    pub complaint:         bool,
    pub dormancy:          bool,
}

impl RiskFlags {
    pub fn any(&self) -> bool {
        self.declining_balance
            || self.reduced_activity
            || self.low_engagement
            || self.complaint
            || self.dormancy
    }

    pub fn count(&self) -> u32 {
        u32::from(self.declining_balance)
            + u32::from(self.reduced_activity)
            + u32::from(self.low_engagement)
            + u32::from(self.complaint)
            + u32::from(self.dormancy)
    }
}

/// Evaluate all five risk-driver flags for one customer.
pub fn evaluate(agg: &CustomerAggregates, cfg: &ScoringConfig) -> RiskFlags {
    RiskFlags {
        declining_balance: agg.total_relationship_balance < cfg.low_total_balance
            || agg.primary_account_balance < cfg.low_primary_balance,

        // Needs a prior-period baseline; a customer with no prior activity
        // cannot have reduced it.
        reduced_activity: agg.txn_count_prior_3m > 0
            && f64::from(agg.txn_count_recent_3m)
                < cfg.reduced_activity_ratio * f64::from(agg.txn_count_prior_3m),

        low_engagement: agg.login_count_30d < cfg.low_engagement_logins
            && !agg.mobile_app_active,

        complaint: agg.open_complaints_count > 0
            || agg.complaints_last_12m >= cfg.repeat_complaint_count,

        dormancy: agg.days_since_last_transaction > cfg.dormancy_days,
    }
}
