//! Aggregator — collapses each source entity to per-customer summaries.
//!
//! Modeled as one pure function per customer with no shared accumulator,
//! so the pipeline can fan out across customers freely. Every metric
//! defaults to its zero-value when no matching rows exist; scoring never
//! sees a null.

use crate::{
    config::ScoringConfig,
    dates::{months_back, whole_months_between},
    error::PipelineResult,
    model::{Account, Complaint, ComplaintStatus, Customer, EngagementSnapshot, Transaction},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionTrend {
    Increasing,
    Stable,
    Declining,
    SeverelyDeclining,
}

/// Coarse single-snapshot proxy; there is no historical balance series
/// in scope, so "declining" just means the relationship balance sits
/// under the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceTrend {
    Stable,
    Declining,
}

/// Per-customer summaries feeding the flag, score and classification
/// stages.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerAggregates {
    pub relationship_tenure_months:  i64,
    pub total_products_held:         u32,
    pub primary_account_balance:     f64,
    pub total_relationship_balance:  f64,
    pub txn_count_recent_3m:         u32,
    pub txn_count_prior_3m:          u32,
    pub avg_monthly_transactions_3m: f64,
    pub days_since_last_transaction: i64,
    pub transaction_trend:           TransactionTrend,
    pub balance_trend:               BalanceTrend,
    pub login_count_30d:             u32,
    pub mobile_app_active:           bool,
    pub online_banking_active:       bool,
    pub digital_engagement_score:    u32,
    pub open_complaints_count:       u32,
    pub complaints_last_12m:         u32,
}

/// Compute all aggregates for one customer from their filtered rows.
pub fn aggregate(
    customer: &Customer,
    accounts: &[Account],
    transactions: &[Transaction],
    engagement: Option<&EngagementSnapshot>,
    complaints: &[Complaint],
    as_of: NaiveDate,
    cfg: &ScoringConfig,
) -> PipelineResult<CustomerAggregates> {
    let recent_cutoff = months_back(as_of, cfg.recent_window_months)?;

    let relationship_tenure_months = whole_months_between(customer.onboarded_on, as_of);

    let total_products_held = accounts.len() as u32;
    let total_relationship_balance: f64 = accounts.iter().map(|a| a.balance).sum();
    // Max, not sum: several checking products still report one primary
    // balance. Zero if the customer holds no checking-style product.
    let primary_account_balance = accounts
        .iter()
        .filter(|a| a.account_type.is_primary_product())
        .map(|a| a.balance)
        .fold(None::<f64>, |best, b| Some(best.map_or(b, |a| a.max(b))))
        .unwrap_or(0.0);

    // Recent window is closed at as_of−3m; the prior window is half-open
    // [as_of−6m, as_of−3m). The filter already removed anything outside
    // the 6-month total window.
    let txn_count_recent_3m =
        transactions.iter().filter(|t| t.posted_on >= recent_cutoff).count() as u32;
    let txn_count_prior_3m =
        transactions.iter().filter(|t| t.posted_on < recent_cutoff).count() as u32;

    let avg_monthly_transactions_3m = round1(
        f64::from(txn_count_recent_3m) / f64::from(cfg.recent_window_months),
    );

    let days_since_last_transaction = transactions
        .iter()
        .map(|t| t.posted_on)
        .max()
        .map(|last| (as_of - last).num_days())
        .unwrap_or(cfg.dormancy_sentinel_days);

    let transaction_trend = transaction_trend(txn_count_recent_3m, txn_count_prior_3m, cfg);

    let balance_trend = if total_relationship_balance > cfg.balance_trend_floor {
        BalanceTrend::Stable
    } else {
        BalanceTrend::Declining
    };

    let (login_count_30d, mobile_app_active, online_banking_active, features_used_count) =
        match engagement {
            Some(s) => (s.login_count_30d, s.mobile_app_active, s.online_banking_active, s.features_used_count),
            None => (0, false, false, 0),
        };
    let digital_engagement_score = engagement_score(
        login_count_30d,
        mobile_app_active,
        online_banking_active,
        features_used_count,
        cfg,
    );

    let open_complaints_count = complaints
        .iter()
        .filter(|c| c.status == ComplaintStatus::Open)
        .count() as u32;
    let complaints_last_12m = complaints.len() as u32;

    Ok(CustomerAggregates {
        relationship_tenure_months,
        total_products_held,
        primary_account_balance,
        total_relationship_balance,
        txn_count_recent_3m,
        txn_count_prior_3m,
        avg_monthly_transactions_3m,
        days_since_last_transaction,
        transaction_trend,
        balance_trend,
        login_count_30d,
        mobile_app_active,
        online_banking_active,
        digital_engagement_score,
        open_complaints_count,
        complaints_last_12m,
    })
}

/// Recent-vs-prior transaction count ratio mapped to a trend bucket.
/// A zero prior count gives no baseline, so the trend reads stable.
fn transaction_trend(recent: u32, prior: u32, cfg: &ScoringConfig) -> TransactionTrend {
    if prior == 0 {
        return TransactionTrend::Stable;
    }
    let ratio = f64::from(recent) / f64::from(prior);
    if ratio > cfg.trend_increasing_ratio {
        TransactionTrend::Increasing
    } else if ratio >= cfg.trend_stable_ratio {
        TransactionTrend::Stable
    } else if ratio >= cfg.trend_declining_ratio {
        TransactionTrend::Declining
    } else {
        TransactionTrend::SeverelyDeclining
    }
}

/// Weighted digital-engagement score, capped at 100.
fn engagement_score(
    logins: u32,
    mobile: bool,
    online: bool,
    features: u32,
    cfg: &ScoringConfig,
) -> u32 {
    let mut score = logins * cfg.engagement_login_weight + features * cfg.engagement_feature_weight;
    if mobile {
        score += cfg.engagement_mobile_bonus;
    }
    if online {
        score += cfg.engagement_online_bonus;
    }
    score.min(100)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
