//! End-to-end pipeline tests: the worked example, output invariants,
//! idempotence, and failure semantics.

use chrono::{NaiveDate, TimeZone, Utc};
use churnrisk_core::{
    classify::{Intervention, RiskDriver},
    config::ScoringConfig,
    filter::SourceEntity,
    model::*,
    pipeline::{run, run_at},
    score::RiskTier,
    validate::{validate_output, QualityViolation},
};
use std::collections::HashSet;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn as_of() -> NaiveDate {
    d(2026, 6, 30)
}

fn customer(id: &str, segment: CustomerSegment, onboarded: NaiveDate) -> Customer {
    Customer {
        customer_id:         id.into(),
        name:                format!("Customer {id}"),
        segment,
        region:              "NORTHEAST".into(),
        onboarded_on:        onboarded,
        verification_status: VerificationStatus::Verified,
    }
}

fn account(id: &str, customer_id: &str, account_type: AccountType, balance: f64) -> Account {
    Account {
        account_id:   id.into(),
        customer_id:  customer_id.into(),
        account_type,
        status:       AccountStatus::Active,
        balance,
    }
}

fn txn(id: &str, account_id: &str, posted_on: NaiveDate) -> Transaction {
    Transaction {
        txn_id:     id.into(),
        account_id: account_id.into(),
        posted_on,
        amount:     40.0,
        channel:    "CARD".into(),
    }
}

fn snapshot(id: &str, customer_id: &str, logins: u32, mobile: bool) -> EngagementSnapshot {
    EngagementSnapshot {
        snapshot_id:           id.into(),
        customer_id:           customer_id.into(),
        measurement_date:      d(2026, 6, 15),
        login_count_30d:       logins,
        mobile_app_active:     mobile,
        online_banking_active: mobile,
        features_used_count:   logins / 3,
    }
}

fn open_complaint(id: &str, customer_id: &str) -> Complaint {
    Complaint {
        complaint_id: id.into(),
        customer_id:  customer_id.into(),
        filed_on:     d(2026, 5, 1),
        status:       ComplaintStatus::Open,
    }
}

/// A mixed book: healthy, dormant, declining, complaining and brand-new
/// customers, enough to land records in several tiers.
fn mixed_sources() -> SourceData {
    let mut sources = SourceData::default();

    // Healthy long-tenure multi-product customer.
    sources.customers.push(customer("cust-healthy", CustomerSegment::Affluent, d(2018, 3, 1)));
    sources.accounts.push(account("h-chk", "cust-healthy", AccountType::Checking, 12_000.0));
    sources.accounts.push(account("h-sav", "cust-healthy", AccountType::Savings, 40_000.0));
    sources.accounts.push(account("h-inv", "cust-healthy", AccountType::Investment, 90_000.0));
    for i in 0..40 {
        let date = if i % 2 == 0 { d(2026, 6, 10) } else { d(2026, 2, 10) };
        sources.transactions.push(txn(&format!("h-t{i}"), "h-chk", date));
    }
    sources.engagement.push(snapshot("h-snap", "cust-healthy", 25, true));

    // Dormant low-balance customer.
    sources.customers.push(customer("cust-dormant", CustomerSegment::MassMarket, d(2024, 1, 1)));
    sources.accounts.push(account("d-chk", "cust-dormant", AccountType::Checking, 80.0));
    sources.transactions.push(txn("d-t0", "d-chk", d(2026, 2, 1)));

    // Declining-activity customer with complaints.
    sources.customers.push(customer("cust-declining", CustomerSegment::MassAffluent, d(2022, 7, 1)));
    sources.accounts.push(account("c-chk", "cust-declining", AccountType::Checking, 2_500.0));
    for i in 0..12 {
        sources.transactions.push(txn(&format!("c-p{i}"), "c-chk", d(2026, 1, 20)));
    }
    for i in 0..3 {
        sources.transactions.push(txn(&format!("c-r{i}"), "c-chk", d(2026, 6, 5)));
    }
    sources.engagement.push(snapshot("c-snap", "cust-declining", 1, false));
    sources.complaints.push(open_complaint("c-cmp", "cust-declining"));

    // Brand-new zero-activity customer.
    sources.customers.push(customer("cust-new", CustomerSegment::HighNetWorth, d(2026, 6, 1)));

    sources
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The worked scenario: mass-market, short tenure, low balance, all
/// activity in the prior window, zero engagement, one open complaint.
/// Every flag fires and the raw score overflows the cap.
#[test]
fn worked_example_scores_critical() {
    let mut sources = SourceData::default();
    sources.customers.push(customer("cust-ex", CustomerSegment::MassMarket, d(2025, 8, 20)));
    sources.accounts.push(account("ex-chk", "cust-ex", AccountType::Checking, 300.0));
    sources.transactions.push(txn("ex-t1", "ex-chk", d(2026, 1, 15)));
    sources.transactions.push(txn("ex-t2", "ex-chk", d(2026, 2, 10)));
    sources.complaints.push(open_complaint("ex-cmp", "cust-ex"));

    let output = run(&sources, as_of(), &ScoringConfig::default()).unwrap();
    assert_eq!(output.records.len(), 1);

    let record = &output.records[0];
    assert_eq!(record.relationship_tenure_months, 10);
    assert!(record.declining_balance_flag);
    assert!(record.reduced_activity_flag); // 0 recent < 0.7 × 2 prior
    assert!(record.low_engagement_flag);
    assert!(record.complaint_flag);
    assert!(record.dormancy_flag); // last txn 140 days back

    assert_eq!(record.churn_risk_score, 100);
    assert_eq!(record.risk_tier, RiskTier::Critical);
    assert_eq!(record.primary_risk_driver, RiskDriver::Dormancy);
    assert_eq!(record.recommended_intervention, Intervention::UrgentEscalation);
    assert_eq!(record.intervention_priority, 1);
}

/// One record per verified customer, unique ids, stable order.
#[test]
fn one_record_per_eligible_customer() {
    let mut sources = mixed_sources();
    sources.customers.push(Customer {
        verification_status: VerificationStatus::Pending,
        ..customer("cust-unverified", CustomerSegment::MassMarket, d(2024, 1, 1))
    });

    let output = run(&sources, as_of(), &ScoringConfig::default()).unwrap();
    assert_eq!(output.records.len(), 4);
    assert_eq!(output.run.eligible_customers, 4);

    let ids: Vec<_> = output.records.iter().map(|r| r.customer_id.clone()).collect();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());

    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted, "records must come out in stable id order");
}

/// Identical inputs, as-of date and pinned timestamp reproduce
/// byte-identical records.
#[test]
fn pipeline_is_idempotent() {
    let sources = mixed_sources();
    let stamp = Utc.with_ymd_and_hms(2026, 6, 30, 6, 0, 0).unwrap();
    let cfg = ScoringConfig::default();

    let first = run_at(&sources, as_of(), stamp, &cfg).unwrap();
    let second = run_at(&sources, as_of(), stamp, &cfg).unwrap();

    let first_json = serde_json::to_string(&first.records).unwrap();
    let second_json = serde_json::to_string(&second.records).unwrap();
    assert_eq!(first_json, second_json);
}

/// A run with zero eligible customers produces an empty output set, not
/// an error.
#[test]
fn empty_source_set_yields_empty_output() {
    let output = run(&SourceData::default(), as_of(), &ScoringConfig::default()).unwrap();
    assert!(output.records.is_empty());
    assert_eq!(output.run.eligible_customers, 0);
}

/// A customer row without an identity is rejected and reported while the
/// rest of the batch scores normally.
#[test]
fn malformed_customer_rejected_without_abort() {
    let mut sources = mixed_sources();
    sources.customers.push(customer("", CustomerSegment::MassMarket, d(2024, 1, 1)));

    let output = run(&sources, as_of(), &ScoringConfig::default()).unwrap();
    assert_eq!(output.records.len(), 4);
    assert_eq!(output.rejections.len(), 1);
    assert_eq!(output.rejections[0].entity, SourceEntity::Customer);
    assert!(output.rejections[0].reason.contains("customer_id"));
}

/// Every cross-record output invariant holds on a mixed book: score
/// bounds, tier alignment, flag backing for high tiers, escalation
/// gating, priority consistency, identity uniqueness, freshness.
#[test]
fn mixed_book_passes_all_quality_checks() {
    let cfg = ScoringConfig::default();
    let output = run(&mixed_sources(), as_of(), &cfg).unwrap();
    assert!(output.records.len() >= 4);

    let findings = validate_output(&output.records, 1, output.run.calculated_at, &cfg);
    assert!(findings.is_empty(), "unexpected findings: {findings:?}");

    let tiers: HashSet<_> = output.records.iter().map(|r| r.risk_tier).collect();
    assert!(tiers.len() >= 2, "mixed book should span multiple tiers");
}

/// The freshness check flags records older than the configured max age.
#[test]
fn stale_output_detected() {
    let cfg = ScoringConfig::default();
    let output = run(&mixed_sources(), as_of(), &cfg).unwrap();

    let later = output.run.calculated_at + chrono::Duration::hours(cfg.freshness_max_age_hours + 1);
    let findings = validate_output(&output.records, 1, later, &cfg);
    assert_eq!(findings.len(), output.records.len());
    assert!(matches!(findings[0], QualityViolation::StaleTimestamp { .. }));
}

/// The minimum-row-count check reports an under-filled output set.
#[test]
fn row_count_minimum_enforced() {
    let cfg = ScoringConfig::default();
    let output = run(&SourceData::default(), as_of(), &cfg).unwrap();

    let findings = validate_output(&output.records, 1, output.run.calculated_at, &cfg);
    assert_eq!(
        findings,
        vec![QualityViolation::RowCountBelowMinimum { rows: 0, min_rows: 1 }]
    );
}
