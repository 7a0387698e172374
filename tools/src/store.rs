//! SQLite persistence for pipeline output.
//!
//! RULE: only store.rs talks to the database. The output set fully
//! replaces the prior run's rows — create-or-replace, no deltas.

use anyhow::Result;
use churnrisk_core::{pipeline::PipelineOutput, record::ChurnRiskRecord};
use rusqlite::{params, Connection};
use serde::Serialize;

pub struct OutputStore {
    conn: Connection,
}

impl OutputStore {
    /// Open (or create) the output database at `path`.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS pipeline_run (
                run_id             TEXT PRIMARY KEY,
                as_of              TEXT NOT NULL,
                calculated_at      TEXT NOT NULL,
                model_version      TEXT NOT NULL,
                eligible_customers INTEGER NOT NULL,
                rejected_rows      INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS churn_risk_record (
                customer_id              TEXT PRIMARY KEY,
                run_id                   TEXT NOT NULL,
                customer_name            TEXT NOT NULL,
                segment                  TEXT NOT NULL,
                region                   TEXT NOT NULL,
                churn_risk_score         INTEGER NOT NULL,
                risk_tier                TEXT NOT NULL,
                primary_risk_driver      TEXT NOT NULL,
                recommended_intervention TEXT NOT NULL,
                intervention_priority    INTEGER NOT NULL,
                calculated_at            TEXT NOT NULL,
                model_version            TEXT NOT NULL,
                payload                  TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Persist one run's output, replacing whatever the prior run wrote.
    pub fn replace_output(&mut self, output: &PipelineOutput) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM churn_risk_record", [])?;
        tx.execute(
            "INSERT INTO pipeline_run
                (run_id, as_of, calculated_at, model_version, eligible_customers, rejected_rows)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                output.run.run_id,
                output.run.as_of.to_string(),
                output.run.calculated_at.to_rfc3339(),
                output.run.model_version,
                output.run.eligible_customers as i64,
                output.run.rejected_rows as i64,
            ],
        )?;

        for record in &output.records {
            insert_record(&tx, &output.run.run_id, record)?;
        }

        tx.commit()?;
        Ok(())
    }

    pub fn record_count(&self) -> Result<i64> {
        let count =
            self.conn.query_row("SELECT COUNT(*) FROM churn_risk_record", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Record count per tier, highest-risk tiers first.
    pub fn tier_distribution(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT risk_tier, COUNT(*) FROM churn_risk_record
             GROUP BY risk_tier
             ORDER BY COUNT(*) DESC",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn intervention_distribution(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT recommended_intervention, COUNT(*) FROM churn_risk_record
             GROUP BY recommended_intervention
             ORDER BY COUNT(*) DESC",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn average_score(&self) -> Result<f64> {
        let avg = self.conn.query_row(
            "SELECT COALESCE(AVG(churn_risk_score), 0.0) FROM churn_risk_record",
            [],
            |row| row.get(0),
        )?;
        Ok(avg)
    }
}

fn insert_record(tx: &rusqlite::Transaction<'_>, run_id: &str, record: &ChurnRiskRecord) -> Result<()> {
    tx.execute(
        "INSERT INTO churn_risk_record (
            customer_id, run_id, customer_name, segment, region,
            churn_risk_score, risk_tier, primary_risk_driver,
            recommended_intervention, intervention_priority,
            calculated_at, model_version, payload
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
        params![
            record.customer_id,
            run_id,
            record.customer_name,
            enum_text(&record.segment)?,
            record.region,
            i64::from(record.churn_risk_score),
            enum_text(&record.risk_tier)?,
            enum_text(&record.primary_risk_driver)?,
            enum_text(&record.recommended_intervention)?,
            i64::from(record.intervention_priority),
            record.calculated_at.to_rfc3339(),
            record.model_version,
            serde_json::to_string(record)?,
        ],
    )?;
    Ok(())
}

/// The SCREAMING_SNAKE_CASE wire form of a unit enum variant.
fn enum_text<T: Serialize>(value: &T) -> Result<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(text) => Ok(text),
        other => Ok(other.to_string()),
    }
}
