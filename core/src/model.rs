//! Source entity shapes consumed from the upstream ingestion layer.
//!
//! RULE: these are read-only inputs. The pipeline never mutates a source
//! row; missing related rows default downstream aggregates to zero/false
//! rather than propagating as nulls.

use crate::types::{CustomerId, EntityId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Enumerations ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerSegment {
    MassMarket,
    MassAffluent,
    Affluent,
    HighNetWorth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Verified,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Loan,
    Investment,
}

impl AccountType {
    /// Whether this type denotes the primary checking-style product
    /// whose balance feeds `primary_account_balance`.
    pub fn is_primary_product(self) -> bool {
        matches!(self, AccountType::Checking)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    Open,
    Resolved,
}

// ── Entities ─────────────────────────────────────────────────────────────────

/// Immutable customer reference row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id:         CustomerId,
    pub name:                String,
    pub segment:             CustomerSegment,
    pub region:              String,
    pub onboarded_on:        NaiveDate,
    pub verification_status: VerificationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id:   EntityId,
    pub customer_id:  CustomerId,
    pub account_type: AccountType,
    pub status:       AccountStatus,
    pub balance:      f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub txn_id:     EntityId,
    pub account_id: EntityId,
    pub posted_on:  NaiveDate,
    pub amount:     f64,
    pub channel:    String,
}

/// One digital-engagement measurement for a customer. A customer may
/// carry several rows with different `measurement_date`s; only the
/// latest one is used per run, ties broken by `snapshot_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementSnapshot {
    pub snapshot_id:           EntityId,
    pub customer_id:           CustomerId,
    pub measurement_date:      NaiveDate,
    pub login_count_30d:       u32,
    pub mobile_app_active:     bool,
    pub online_banking_active: bool,
    pub features_used_count:   u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub complaint_id: EntityId,
    pub customer_id:  CustomerId,
    pub filed_on:     NaiveDate,
    pub status:       ComplaintStatus,
}

/// The five source collections, loaded in bulk before scoring starts.
/// Read-only once constructed; safe to share immutably across workers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceData {
    pub customers:    Vec<Customer>,
    pub accounts:     Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub engagement:   Vec<EngagementSnapshot>,
    pub complaints:   Vec<Complaint>,
}
