//! The output entity: one wide churn-risk record per eligible customer.
//!
//! Records are recomputed wholesale every run (create-or-replace), never
//! mutated in place between runs.

use crate::{
    aggregate::{BalanceTrend, CustomerAggregates, TransactionTrend},
    classify::{Intervention, RiskDriver},
    flags::RiskFlags,
    model::{Customer, CustomerSegment},
    score::{RiskTier, ScoreBreakdown},
    types::CustomerId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output columns carrying customer-identifying data. The downstream
/// access-control layer applies column-level redaction to these; the
/// pipeline itself performs none.
pub const SENSITIVE_COLUMNS: &[&str] = &["customer_id", "customer_name"];

/// One risk driver's contribution: whether it fired, the points it
/// added, and the metric that drove it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DriverDetail {
    pub flagged: bool,
    pub points:  i64,
    pub metric:  f64,
}

/// Per-driver explainability breakdown emitted with every record.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DriverBreakdown {
    pub declining_balance: DriverDetail,
    pub reduced_activity:  DriverDetail,
    pub low_engagement:    DriverDetail,
    pub complaints:        DriverDetail,
    pub dormancy:          DriverDetail,
    pub base_score:          i64,
    pub protective_credits:  i64,
    pub segment_adjustment:  i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChurnRiskRecord {
    // Identity passthrough (sensitive, see SENSITIVE_COLUMNS)
    pub customer_id:   CustomerId,
    pub customer_name: String,
    pub segment:       CustomerSegment,
    pub region:        String,

    // Aggregates
    pub relationship_tenure_months:  i64,
    pub total_products_held:         u32,
    pub primary_account_balance:     f64,
    pub total_relationship_balance:  f64,
    pub avg_monthly_transactions_3m: f64,
    pub transaction_trend:           TransactionTrend,
    pub balance_trend:               BalanceTrend,
    pub days_since_last_transaction: i64,
    pub digital_engagement_score:    u32,
    pub open_complaints_count:       u32,
    pub complaints_last_12m:         u32,

    // Risk-driver flags
    pub declining_balance_flag: bool,
    pub reduced_activity_flag:  bool,
    pub low_engagement_flag:    bool,
    pub complaint_flag:         bool,
    pub dormancy_flag:          bool,

    // Score, tier, classification
    pub churn_risk_score:         u8,
    pub risk_tier:                RiskTier,
    pub primary_risk_driver:      RiskDriver,
    pub recommended_intervention: Intervention,
    pub intervention_priority:    u8,

    // Explainability and provenance
    pub driver_breakdown: DriverBreakdown,
    pub calculated_at:    DateTime<Utc>,
    pub model_version:    String,
}

/// Assemble the final record from every stage's output for one customer.
#[allow(clippy::too_many_arguments)]
pub fn assemble(
    customer: &Customer,
    agg: &CustomerAggregates,
    flags: &RiskFlags,
    breakdown: &ScoreBreakdown,
    tier: RiskTier,
    driver: RiskDriver,
    intervention: Intervention,
    priority: u8,
    calculated_at: DateTime<Utc>,
    model_version: &str,
) -> ChurnRiskRecord {
    let driver_breakdown = DriverBreakdown {
        declining_balance: DriverDetail {
            flagged: flags.declining_balance,
            points:  breakdown.declining_balance_points,
            metric:  agg.total_relationship_balance,
        },
        reduced_activity: DriverDetail {
            flagged: flags.reduced_activity,
            points:  breakdown.reduced_activity_points,
            metric:  f64::from(agg.txn_count_recent_3m),
        },
        low_engagement: DriverDetail {
            flagged: flags.low_engagement,
            points:  breakdown.low_engagement_points,
            metric:  f64::from(agg.digital_engagement_score),
        },
        complaints: DriverDetail {
            flagged: flags.complaint,
            points:  breakdown.complaint_points,
            metric:  f64::from(agg.open_complaints_count),
        },
        dormancy: DriverDetail {
            flagged: flags.dormancy,
            points:  breakdown.dormancy_points,
            metric:  agg.days_since_last_transaction as f64,
        },
        base_score: breakdown.base,
        protective_credits: breakdown.product_depth_credit
            + breakdown.tenure_credit
            + breakdown.engagement_credit,
        segment_adjustment: breakdown.segment_adjustment,
    };

    ChurnRiskRecord {
        customer_id:   customer.customer_id.clone(),
        customer_name: customer.name.clone(),
        segment:       customer.segment,
        region:        customer.region.clone(),

        relationship_tenure_months:  agg.relationship_tenure_months,
        total_products_held:         agg.total_products_held,
        primary_account_balance:     agg.primary_account_balance,
        total_relationship_balance:  agg.total_relationship_balance,
        avg_monthly_transactions_3m: agg.avg_monthly_transactions_3m,
        transaction_trend:           agg.transaction_trend,
        balance_trend:               agg.balance_trend,
        days_since_last_transaction: agg.days_since_last_transaction,
        digital_engagement_score:    agg.digital_engagement_score,
        open_complaints_count:       agg.open_complaints_count,
        complaints_last_12m:         agg.complaints_last_12m,

        declining_balance_flag: flags.declining_balance,
        reduced_activity_flag:  flags.reduced_activity,
        low_engagement_flag:    flags.low_engagement,
        complaint_flag:         flags.complaint,
        dormancy_flag:          flags.dormancy,

        churn_risk_score:         breakdown.score,
        risk_tier:                tier,
        primary_risk_driver:      driver,
        recommended_intervention: intervention,
        intervention_priority:    priority,

        driver_breakdown,
        calculated_at,
        model_version: model_version.to_string(),
    }
}
