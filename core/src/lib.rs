//! churnrisk-core — customer-level churn-risk scoring for retail banking.
//!
//! Turns five read-only source collections (customers, accounts,
//! transactions, engagement snapshots, complaints) into one wide
//! churn-risk record per eligible customer: aggregates, five boolean
//! risk drivers, a 0–100 composite score, an ordinal tier, and an
//! explained intervention recommendation.
//!
//! Scoring is deterministic rule-based arithmetic with fixed weights —
//! no statistical fitting. Stages 2–5 are pure per-customer functions;
//! the pipeline fans out across customers on the rayon pool. Ingestion
//! and persistence of source rows stay outside this crate.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod dates;
pub mod error;
pub mod filter;
pub mod flags;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod score;
pub mod types;
pub mod validate;
