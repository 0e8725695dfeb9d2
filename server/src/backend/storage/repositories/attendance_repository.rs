use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::{format_date, format_timestamp, parse_timestamp, parse_week};
use crate::backend::domain::models::attendance::{AttendanceDelta, LedgerEntry, WeekDays};
use crate::backend::domain::models::week::WeekKey;
use crate::backend::storage::connection::DbConnection;

const ENTRY_COLUMNS: &str = "id, worker_id, week_start, mon, tue, wed, thu, fri, sat, sun, \
     cumulative_advance, cumulative_recovery, settled, updated_at";

// Create the row or fold the submission into it. The WHERE clause on the
// update branch leaves settled rows untouched, so rows_affected is 0 for them.
const UPSERT_WITH_DAYS: &str = r#"
    INSERT INTO attendance (
        id, worker_id, week_start, mon, tue, wed, thu, fri, sat, sun,
        cumulative_advance, cumulative_recovery, settled, updated_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
    ON CONFLICT (worker_id, week_start) DO UPDATE SET
        mon = excluded.mon,
        tue = excluded.tue,
        wed = excluded.wed,
        thu = excluded.thu,
        fri = excluded.fri,
        sat = excluded.sat,
        sun = excluded.sun,
        cumulative_advance = attendance.cumulative_advance + excluded.cumulative_advance,
        cumulative_recovery = attendance.cumulative_recovery + excluded.cumulative_recovery,
        updated_at = excluded.updated_at
    WHERE attendance.settled = 0
"#;

const UPSERT_DELTAS_ONLY: &str = r#"
    INSERT INTO attendance (
        id, worker_id, week_start, mon, tue, wed, thu, fri, sat, sun,
        cumulative_advance, cumulative_recovery, settled, updated_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
    ON CONFLICT (worker_id, week_start) DO UPDATE SET
        cumulative_advance = attendance.cumulative_advance + excluded.cumulative_advance,
        cumulative_recovery = attendance.cumulative_recovery + excluded.cumulative_recovery,
        updated_at = excluded.updated_at
    WHERE attendance.settled = 0
"#;

/// Repository for weekly attendance ledger rows
#[derive(Clone)]
pub struct AttendanceRepository {
    db: DbConnection,
}

impl AttendanceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn get_entry(&self, worker_id: &str, week: WeekKey) -> Result<Option<LedgerEntry>> {
        let mut conn = self.db.pool().acquire().await?;
        Self::get_entry_in(&mut conn, worker_id, week).await
    }

    pub async fn get_entry_in(
        conn: &mut SqliteConnection,
        worker_id: &str,
        week: WeekKey,
    ) -> Result<Option<LedgerEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM attendance WHERE worker_id = ? AND week_start = ?",
            ENTRY_COLUMNS
        ))
        .bind(worker_id)
        .bind(week.to_string())
        .fetch_optional(&mut *conn)
        .await?;

        row.as_ref().map(entry_from_row).transpose()
    }

    /// See [`AttendanceRepository::accumulate_in`]
    pub async fn accumulate(
        &self,
        worker_id: &str,
        week: WeekKey,
        days: Option<WeekDays>,
        delta: AttendanceDelta,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = self.db.pool().acquire().await?;
        Self::accumulate_in(&mut conn, worker_id, week, days, delta, now).await
    }

    /// Upsert the (worker, week) row in a single statement: `days`, when
    /// given, overwrite the stored day values and the delta is added to the
    /// cumulative totals. Returns false if the row is settled, in which case
    /// nothing was written.
    pub async fn accumulate_in(
        conn: &mut SqliteConnection,
        worker_id: &str,
        week: WeekKey,
        days: Option<WeekDays>,
        delta: AttendanceDelta,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let sql = if days.is_some() { UPSERT_WITH_DAYS } else { UPSERT_DELTAS_ONLY };
        let days = days.unwrap_or_default();

        let result = sqlx::query(sql)
            .bind(LedgerEntry::generate_id())
            .bind(worker_id)
            .bind(week.to_string())
            .bind(days.mon)
            .bind(days.tue)
            .bind(days.wed)
            .bind(days.thu)
            .bind(days.fri)
            .bind(days.sat)
            .bind(days.sun)
            .bind(delta.advance)
            .bind(delta.recovery)
            .bind(format_timestamp(&now))
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip `settled` from false to true. Returns false if another writer
    /// got there first.
    pub async fn mark_settled_in(conn: &mut SqliteConnection, worker_id: &str, week: WeekKey) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET settled = 1
            WHERE worker_id = ? AND week_start = ? AND settled = 0
            "#,
        )
        .bind(worker_id)
        .bind(week.to_string())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_week(&self, week: WeekKey) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM attendance WHERE week_start = ? ORDER BY worker_id ASC",
            ENTRY_COLUMNS
        ))
        .bind(week.to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    /// Entries whose week starts between `from` and `to`, both inclusive
    pub async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM attendance
            WHERE week_start >= ? AND week_start <= ?
            ORDER BY week_start ASC, worker_id ASC
            "#,
            ENTRY_COLUMNS
        ))
        .bind(format_date(from))
        .bind(format_date(to))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    /// A worker's entries, newest week first
    pub async fn list_for_worker(&self, worker_id: &str) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM attendance WHERE worker_id = ? ORDER BY week_start DESC",
            ENTRY_COLUMNS
        ))
        .bind(worker_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(entry_from_row).collect()
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<LedgerEntry> {
    let week_start: String = row.try_get("week_start")?;
    let updated_at: String = row.try_get("updated_at")?;
    Ok(LedgerEntry {
        id: row.try_get("id")?,
        worker_id: row.try_get("worker_id")?,
        week: parse_week(&week_start)?,
        days: WeekDays {
            mon: row.try_get("mon")?,
            tue: row.try_get("tue")?,
            wed: row.try_get("wed")?,
            thu: row.try_get("thu")?,
            fri: row.try_get("fri")?,
            sat: row.try_get("sat")?,
            sun: row.try_get("sun")?,
        },
        cumulative_advance: row.try_get("cumulative_advance")?,
        cumulative_recovery: row.try_get("cumulative_recovery")?,
        settled: row.try_get("settled")?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
