//! Synthetic banking dataset generator.
//!
//! Produces the five source collections with plausible segment-driven
//! distributions so a demo run exercises every tier, trend bucket and
//! intervention. Fully deterministic under the seed.

use crate::{names, rng::DataRng};
use chrono::{Duration, NaiveDate};
use churnrisk_core::model::{
    Account, AccountStatus, AccountType, Complaint, ComplaintStatus, Customer, CustomerSegment,
    EngagementSnapshot, SourceData, Transaction, VerificationStatus,
};

const REGIONS: &[&str] = &["NORTHEAST", "SOUTHEAST", "MIDWEST", "SOUTHWEST", "WEST"];
const CHANNELS: &[&str] = &["CARD", "ACH", "WIRE", "ATM", "BRANCH", "MOBILE"];

const SEGMENTS: &[CustomerSegment] = &[
    CustomerSegment::MassMarket,
    CustomerSegment::MassAffluent,
    CustomerSegment::Affluent,
    CustomerSegment::HighNetWorth,
];
const SEGMENT_WEIGHTS: &[f64] = &[0.55, 0.25, 0.15, 0.05];

/// Mean balance scale per segment, indexed like SEGMENTS.
const BALANCE_SCALE: &[f64] = &[400.0, 3_000.0, 15_000.0, 80_000.0];

/// Monthly transaction volume per segment, indexed like SEGMENTS.
const MONTHLY_TXN_MEAN: &[i64] = &[9, 14, 18, 22];

/// Generate a full synthetic dataset of `customer_count` customers.
pub fn generate(customer_count: usize, as_of: NaiveDate, rng: &mut DataRng) -> SourceData {
    let mut data = SourceData::default();

    for index in 0..customer_count {
        let customer_id = format!("cust-{index:06}");
        let segment_index = rng.pick_weighted(SEGMENT_WEIGHTS);
        let segment = SEGMENTS[segment_index];

        // ~5% of rows fail verification and drop out at the filter.
        let verification_status = if rng.chance(0.95) {
            VerificationStatus::Verified
        } else if rng.chance(0.5) {
            VerificationStatus::Pending
        } else {
            VerificationStatus::Failed
        };

        data.customers.push(Customer {
            customer_id: customer_id.clone(),
            name: names::full_name(rng),
            segment,
            region: (*rng.pick(REGIONS)).to_string(),
            onboarded_on: as_of - Duration::days(rng.range_i64(30, 3_650)),
            verification_status,
        });

        let account_count = rng.range_i64(0, 4) as usize;
        let mut account_ids = Vec::with_capacity(account_count);
        for account_index in 0..account_count {
            let account_id = format!("{customer_id}-acct-{account_index}");
            // First account is almost always the checking relationship.
            let account_type = if account_index == 0 && rng.chance(0.9) {
                AccountType::Checking
            } else {
                *rng.pick(&[
                    AccountType::Savings,
                    AccountType::CreditCard,
                    AccountType::Loan,
                    AccountType::Investment,
                    AccountType::Checking,
                ])
            };
            let status = if rng.chance(0.9) { AccountStatus::Active } else { AccountStatus::Closed };
            data.accounts.push(Account {
                account_id: account_id.clone(),
                customer_id: customer_id.clone(),
                account_type,
                status,
                balance: rng.pareto(BALANCE_SCALE[segment_index] * 0.2, 1.5).min(5_000_000.0),
            });
            if status == AccountStatus::Active {
                account_ids.push(account_id);
            }
        }

        // Transactions over the last ~7 months; a dormant minority stops
        // entirely, a declining minority thins out in the recent window.
        if !account_ids.is_empty() {
            let dormant = rng.chance(0.12);
            let declining = rng.chance(0.20);
            let monthly = MONTHLY_TXN_MEAN[segment_index];
            let total = (monthly * 7).max(1);
            for txn_index in 0..total {
                let days_back = if dormant {
                    rng.range_i64(70, 210)
                } else if declining && rng.chance(0.75) {
                    rng.range_i64(95, 210)
                } else {
                    rng.range_i64(0, 210)
                };
                data.transactions.push(Transaction {
                    txn_id: format!("{customer_id}-txn-{txn_index}"),
                    account_id: rng.pick(&account_ids).clone(),
                    posted_on: as_of - Duration::days(days_back),
                    amount: rng.pareto(5.0, 1.2).min(50_000.0),
                    channel: (*rng.pick(CHANNELS)).to_string(),
                });
            }
        }

        // Engagement: most customers have a snapshot; some carry stale
        // history rows the filter must discard.
        if rng.chance(0.85) {
            let snapshot_count = rng.range_i64(1, 3);
            for snapshot_index in 0..snapshot_count {
                data.engagement.push(EngagementSnapshot {
                    snapshot_id: format!("{customer_id}-snap-{snapshot_index}"),
                    customer_id: customer_id.clone(),
                    measurement_date: as_of - Duration::days(rng.range_i64(0, 90)),
                    login_count_30d: rng.range_i64(0, 40) as u32,
                    mobile_app_active: rng.chance(0.6),
                    online_banking_active: rng.chance(0.7),
                    features_used_count: rng.range_i64(0, 12) as u32,
                });
            }
        }

        if rng.chance(0.25) {
            let complaint_count = rng.range_i64(1, 3);
            for complaint_index in 0..complaint_count {
                data.complaints.push(Complaint {
                    complaint_id: format!("{customer_id}-cmp-{complaint_index}"),
                    customer_id: customer_id.clone(),
                    filed_on: as_of - Duration::days(rng.range_i64(0, 450)),
                    status: if rng.chance(0.3) {
                        ComplaintStatus::Open
                    } else {
                        ComplaintStatus::Resolved
                    },
                });
            }
        }
    }

    data
}
