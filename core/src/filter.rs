//! Source filter — the first pipeline stage.
//!
//! Selects the eligible subset of each source collection:
//!   1. Customers with VERIFIED status only
//!   2. ACTIVE accounts of eligible customers only
//!   3. Transactions inside the 6-month window, scoped to eligible accounts
//!   4. Exactly one engagement snapshot per customer (latest wins)
//!   5. Complaints inside the 12-month window
//!
//! Pure filtering, no side effects. Rows missing a required identity or
//! linkage key are rejected and reported — never silently dropped, never
//! a batch abort.

use crate::{
    config::ScoringConfig,
    dates::months_back,
    error::PipelineResult,
    model::{
        Account, AccountStatus, Complaint, Customer, EngagementSnapshot, SourceData, Transaction,
        VerificationStatus,
    },
    types::CustomerId,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

// ── Rejection reporting ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceEntity {
    Customer,
    Account,
    Transaction,
    Engagement,
    Complaint,
}

/// A malformed source row, skipped and reported to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RowRejection {
    pub entity:  SourceEntity,
    pub row_ref: String,
    pub reason:  String,
}

// ── Filtered output ──────────────────────────────────────────────────────────

/// The eligible subsets consumed by every downstream stage, indexed per
/// customer. Read-only after construction; shared immutably across the
/// scoring workers.
#[derive(Debug, Default)]
pub struct FilteredSources {
    /// Eligible customers in stable `customer_id` order.
    pub customers:                Vec<Customer>,
    pub accounts_by_customer:     HashMap<CustomerId, Vec<Account>>,
    pub transactions_by_customer: HashMap<CustomerId, Vec<Transaction>>,
    pub engagement_by_customer:   HashMap<CustomerId, EngagementSnapshot>,
    pub complaints_by_customer:   HashMap<CustomerId, Vec<Complaint>>,
}

impl FilteredSources {
    pub fn accounts(&self, customer_id: &str) -> &[Account] {
        self.accounts_by_customer.get(customer_id).map_or(&[], Vec::as_slice)
    }

    pub fn transactions(&self, customer_id: &str) -> &[Transaction] {
        self.transactions_by_customer.get(customer_id).map_or(&[], Vec::as_slice)
    }

    pub fn engagement(&self, customer_id: &str) -> Option<&EngagementSnapshot> {
        self.engagement_by_customer.get(customer_id)
    }

    pub fn complaints(&self, customer_id: &str) -> &[Complaint] {
        self.complaints_by_customer.get(customer_id).map_or(&[], Vec::as_slice)
    }
}

// ── Filter ───────────────────────────────────────────────────────────────────

/// Apply all eligibility filters to the raw source collections.
///
/// Returns the filtered subsets plus the rejected malformed rows.
pub fn filter_sources(
    sources: &SourceData,
    as_of: NaiveDate,
    cfg: &ScoringConfig,
) -> PipelineResult<(FilteredSources, Vec<RowRejection>)> {
    let txn_cutoff = months_back(as_of, cfg.total_txn_window_months)?;
    let complaint_cutoff = months_back(as_of, cfg.complaint_window_months)?;

    let mut rejections = Vec::new();
    let mut out = FilteredSources::default();

    // 1. Customers: verified, with a usable identity, unique.
    let mut seen_ids: HashSet<&str> = HashSet::new();
    for (index, customer) in sources.customers.iter().enumerate() {
        if customer.customer_id.trim().is_empty() {
            rejections.push(RowRejection {
                entity:  SourceEntity::Customer,
                row_ref: format!("customers[{index}]"),
                reason:  "missing customer_id".to_string(),
            });
            continue;
        }
        if !seen_ids.insert(customer.customer_id.as_str()) {
            rejections.push(RowRejection {
                entity:  SourceEntity::Customer,
                row_ref: customer.customer_id.clone(),
                reason:  "duplicate customer_id".to_string(),
            });
            continue;
        }
        if customer.verification_status == VerificationStatus::Verified {
            out.customers.push(customer.clone());
        }
    }
    out.customers.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));

    let eligible: HashSet<&str> =
        out.customers.iter().map(|c| c.customer_id.as_str()).collect();

    // 2. Accounts: active, linked to an eligible customer.
    let mut account_owner: HashMap<&str, &str> = HashMap::new();
    for account in &sources.accounts {
        if account.account_id.trim().is_empty() || account.customer_id.trim().is_empty() {
            rejections.push(RowRejection {
                entity:  SourceEntity::Account,
                row_ref: account.account_id.clone(),
                reason:  "missing account_id or customer linkage".to_string(),
            });
            continue;
        }
        if account.status != AccountStatus::Active || !eligible.contains(account.customer_id.as_str()) {
            continue;
        }
        account_owner.insert(account.account_id.as_str(), account.customer_id.as_str());
        out.accounts_by_customer
            .entry(account.customer_id.clone())
            .or_default()
            .push(account.clone());
    }

    // 3. Transactions: in-window, scoped to eligible accounts.
    for txn in &sources.transactions {
        if txn.account_id.trim().is_empty() {
            rejections.push(RowRejection {
                entity:  SourceEntity::Transaction,
                row_ref: txn.txn_id.clone(),
                reason:  "missing account linkage".to_string(),
            });
            continue;
        }
        if txn.posted_on < txn_cutoff || txn.posted_on > as_of {
            continue;
        }
        if let Some(owner) = account_owner.get(txn.account_id.as_str()) {
            out.transactions_by_customer
                .entry((*owner).to_string())
                .or_default()
                .push(txn.clone());
        }
    }

    // 4. Engagement: latest snapshot per customer, ties broken by snapshot_id
    //    so reruns are reproducible regardless of input order.
    for snapshot in &sources.engagement {
        if snapshot.customer_id.trim().is_empty() {
            rejections.push(RowRejection {
                entity:  SourceEntity::Engagement,
                row_ref: snapshot.snapshot_id.clone(),
                reason:  "missing customer linkage".to_string(),
            });
            continue;
        }
        if !eligible.contains(snapshot.customer_id.as_str()) {
            continue;
        }
        match out.engagement_by_customer.get(&snapshot.customer_id) {
            Some(current) => {
                let newer = (snapshot.measurement_date, &snapshot.snapshot_id)
                    > (current.measurement_date, &current.snapshot_id);
                if snapshot.measurement_date == current.measurement_date {
                    log::debug!(
                        "ambiguous latest snapshot for {}: {} vs {} on {}",
                        snapshot.customer_id,
                        current.snapshot_id,
                        snapshot.snapshot_id,
                        snapshot.measurement_date,
                    );
                }
                if newer {
                    out.engagement_by_customer
                        .insert(snapshot.customer_id.clone(), snapshot.clone());
                }
            }
            None => {
                out.engagement_by_customer
                    .insert(snapshot.customer_id.clone(), snapshot.clone());
            }
        }
    }

    // 5. Complaints: rolling 12-month window.
    for complaint in &sources.complaints {
        if complaint.customer_id.trim().is_empty() {
            rejections.push(RowRejection {
                entity:  SourceEntity::Complaint,
                row_ref: complaint.complaint_id.clone(),
                reason:  "missing customer linkage".to_string(),
            });
            continue;
        }
        if complaint.filed_on < complaint_cutoff || complaint.filed_on > as_of {
            continue;
        }
        if eligible.contains(complaint.customer_id.as_str()) {
            out.complaints_by_customer
                .entry(complaint.customer_id.clone())
                .or_default()
                .push(complaint.clone());
        }
    }

    log::debug!(
        "filter: {} eligible customers, {} rejected rows (as-of {})",
        out.customers.len(),
        rejections.len(),
        as_of,
    );

    Ok((out, rejections))
}
