//! Shared primitive types used across the entire pipeline.

/// A stable, unique identifier for a customer. The output set is
/// keyed by this value — exactly one record per customer per run.
pub type CustomerId = String;

/// A stable, unique identifier for any other source entity
/// (accounts, transactions, snapshots, complaints).
pub type EntityId = String;

/// The canonical run identifier.
pub type RunId = String;
