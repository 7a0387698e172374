//! Aggregator tests: per-customer summaries, window edges, zero defaults.

use chrono::NaiveDate;
use churnrisk_core::{
    aggregate::{aggregate, BalanceTrend, TransactionTrend},
    config::ScoringConfig,
    model::*,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn as_of() -> NaiveDate {
    d(2026, 6, 30)
}

fn customer(onboarded: NaiveDate) -> Customer {
    Customer {
        customer_id:         "cust-000001".into(),
        name:                "Ada Example".into(),
        segment:             CustomerSegment::MassAffluent,
        region:              "WEST".into(),
        onboarded_on:        onboarded,
        verification_status: VerificationStatus::Verified,
    }
}

fn account(id: &str, account_type: AccountType, balance: f64) -> Account {
    Account {
        account_id:   id.into(),
        customer_id:  "cust-000001".into(),
        account_type,
        status:       AccountStatus::Active,
        balance,
    }
}

fn txn(id: &str, posted_on: NaiveDate) -> Transaction {
    Transaction {
        txn_id:     id.into(),
        account_id: "acct-1".into(),
        posted_on,
        amount:     50.0,
        channel:    "CARD".into(),
    }
}

fn txns_on(recent: u32, prior: u32) -> Vec<Transaction> {
    let mut out = Vec::new();
    for i in 0..recent {
        out.push(txn(&format!("r-{i}"), d(2026, 6, 1)));
    }
    for i in 0..prior {
        out.push(txn(&format!("p-{i}"), d(2026, 1, 15)));
    }
    out
}

fn agg_of(
    accounts: &[Account],
    transactions: &[Transaction],
    engagement: Option<&EngagementSnapshot>,
    complaints: &[Complaint],
) -> churnrisk_core::aggregate::CustomerAggregates {
    let cfg = ScoringConfig::default();
    aggregate(
        &customer(d(2024, 1, 15)),
        accounts,
        transactions,
        engagement,
        complaints,
        as_of(),
        &cfg,
    )
    .unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Tenure counts whole months only; a partial final month is dropped.
#[test]
fn tenure_in_whole_months() {
    let cfg = ScoringConfig::default();
    let agg = aggregate(&customer(d(2025, 8, 15)), &[], &[], None, &[], as_of(), &cfg).unwrap();
    assert_eq!(agg.relationship_tenure_months, 10);

    let agg = aggregate(&customer(d(2025, 8, 31)), &[], &[], None, &[], as_of(), &cfg).unwrap();
    assert_eq!(agg.relationship_tenure_months, 9);
}

/// The recent window is closed at as_of−3m; anything earlier is prior.
#[test]
fn transaction_window_edges() {
    let boundary = d(2026, 3, 30); // as_of − 3 months
    let transactions = vec![
        txn("on-boundary", boundary),
        txn("day-before", d(2026, 3, 29)),
        txn("recent", d(2026, 6, 1)),
    ];
    let agg = agg_of(&[], &transactions, None, &[]);
    assert_eq!(agg.txn_count_recent_3m, 2);
    assert_eq!(agg.txn_count_prior_3m, 1);
}

/// Primary balance takes the max across checking products; other
/// product types never contribute.
#[test]
fn primary_balance_is_max_checking() {
    let accounts = vec![
        account("acct-1", AccountType::Checking, 300.0),
        account("acct-2", AccountType::Checking, 800.0),
        account("acct-3", AccountType::Savings, 5_000.0),
    ];
    let agg = agg_of(&accounts, &[], None, &[]);
    assert_eq!(agg.primary_account_balance, 800.0);
    assert_eq!(agg.total_relationship_balance, 6_100.0);
    assert_eq!(agg.total_products_held, 3);
}

/// No matching rows anywhere defaults every metric to its zero value,
/// with the 999-day dormancy sentinel.
#[test]
fn zero_defaults_on_missing_data() {
    let agg = agg_of(&[], &[], None, &[]);
    assert_eq!(agg.total_products_held, 0);
    assert_eq!(agg.primary_account_balance, 0.0);
    assert_eq!(agg.total_relationship_balance, 0.0);
    assert_eq!(agg.txn_count_recent_3m, 0);
    assert_eq!(agg.avg_monthly_transactions_3m, 0.0);
    assert_eq!(agg.days_since_last_transaction, 999);
    assert_eq!(agg.transaction_trend, TransactionTrend::Stable);
    assert_eq!(agg.balance_trend, BalanceTrend::Declining);
    assert_eq!(agg.digital_engagement_score, 0);
    assert_eq!(agg.open_complaints_count, 0);
    assert_eq!(agg.complaints_last_12m, 0);
}

/// Days-since-last uses the most recent transaction date.
#[test]
fn days_since_last_transaction() {
    let transactions = vec![txn("a", d(2026, 6, 20)), txn("b", d(2026, 5, 1))];
    let agg = agg_of(&[], &transactions, None, &[]);
    assert_eq!(agg.days_since_last_transaction, 10);
}

/// Trend buckets switch at exactly 1.10×, 0.90× and 0.50× of the prior
/// count; a zero prior count reads stable.
#[test]
fn transaction_trend_ratio_cut_points() {
    let cases = [
        (12, 10, TransactionTrend::Increasing),        // 1.2 > 1.1
        (11, 10, TransactionTrend::Stable),            // exactly 1.1
        (9, 10, TransactionTrend::Stable),             // exactly 0.9
        (5, 10, TransactionTrend::Declining),          // exactly 0.5
        (4, 10, TransactionTrend::SeverelyDeclining),  // 0.4
        (0, 0, TransactionTrend::Stable),              // no baseline
    ];
    for (recent, prior, expected) in cases {
        let agg = agg_of(&[], &txns_on(recent, prior), None, &[]);
        assert_eq!(
            agg.transaction_trend, expected,
            "recent={recent} prior={prior}"
        );
    }
}

/// Average monthly transactions rounds to one decimal.
#[test]
fn avg_monthly_rounds_to_one_decimal() {
    let agg = agg_of(&[], &txns_on(7, 0), None, &[]);
    assert_eq!(agg.avg_monthly_transactions_3m, 2.3);
}

/// Balance trend is stable strictly above 1000.
#[test]
fn balance_trend_floor_is_exclusive() {
    let at_floor = agg_of(&[account("acct-1", AccountType::Savings, 1_000.0)], &[], None, &[]);
    assert_eq!(at_floor.balance_trend, BalanceTrend::Declining);

    let above = agg_of(&[account("acct-1", AccountType::Savings, 1_000.01)], &[], None, &[]);
    assert_eq!(above.balance_trend, BalanceTrend::Stable);
}

/// Engagement score = logins×2 + 20(mobile) + 10(online) + features×2,
/// capped at 100.
#[test]
fn engagement_score_formula_and_cap() {
    let snapshot = EngagementSnapshot {
        snapshot_id:           "snap-1".into(),
        customer_id:           "cust-000001".into(),
        measurement_date:      d(2026, 6, 1),
        login_count_30d:       10,
        mobile_app_active:     true,
        online_banking_active: true,
        features_used_count:   5,
    };
    let agg = agg_of(&[], &[], Some(&snapshot), &[]);
    assert_eq!(agg.digital_engagement_score, 60);

    let heavy = EngagementSnapshot {
        login_count_30d: 40,
        features_used_count: 12,
        ..snapshot
    };
    let agg = agg_of(&[], &[], Some(&heavy), &[]);
    assert_eq!(agg.digital_engagement_score, 100);
}

/// Complaint counts split open vs total within the filtered window.
#[test]
fn complaint_counts_by_status() {
    let complaints = vec![
        Complaint {
            complaint_id: "cmp-1".into(),
            customer_id:  "cust-000001".into(),
            filed_on:     d(2026, 5, 1),
            status:       ComplaintStatus::Open,
        },
        Complaint {
            complaint_id: "cmp-2".into(),
            customer_id:  "cust-000001".into(),
            filed_on:     d(2025, 9, 1),
            status:       ComplaintStatus::Resolved,
        },
    ];
    let agg = agg_of(&[], &[], None, &complaints);
    assert_eq!(agg.open_complaints_count, 1);
    assert_eq!(agg.complaints_last_12m, 2);
}
