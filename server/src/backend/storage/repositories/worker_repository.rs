use anyhow::Result;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::{format_timestamp, parse_timestamp};
use crate::backend::domain::models::worker::Worker;
use crate::backend::storage::connection::DbConnection;

const WORKER_COLUMNS: &str = "id, name, phone, daily_rate, advance_balance, is_active, created_at";

/// Repository for the worker directory
#[derive(Clone)]
pub struct WorkerRepository {
    db: DbConnection,
}

impl WorkerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new worker, opening balance included
    pub async fn store_worker(&self, worker: &Worker) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO workers (id, name, phone, daily_rate, advance_balance, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&worker.id)
        .bind(&worker.name)
        .bind(&worker.phone)
        .bind(worker.daily_rate)
        .bind(worker.advance_balance)
        .bind(worker.is_active)
        .bind(format_timestamp(&worker.created_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn get_worker(&self, worker_id: &str) -> Result<Option<Worker>> {
        let mut conn = self.db.pool().acquire().await?;
        Self::get_worker_in(&mut conn, worker_id).await
    }

    pub async fn get_worker_in(conn: &mut SqliteConnection, worker_id: &str) -> Result<Option<Worker>> {
        let row = sqlx::query(&format!("SELECT {} FROM workers WHERE id = ?", WORKER_COLUMNS))
            .bind(worker_id)
            .fetch_optional(&mut *conn)
            .await?;

        row.as_ref().map(worker_from_row).transpose()
    }

    /// List workers ordered by name. `search` matches name or phone,
    /// ignoring case.
    pub async fn list_workers(&self, search: Option<&str>, active_only: bool) -> Result<Vec<Worker>> {
        let pattern = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| format!("%{}%", escape_like(&term.to_lowercase())));

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM workers
            WHERE (?1 IS NULL OR LOWER(name) LIKE ?1 ESCAPE '\' OR LOWER(phone) LIKE ?1 ESCAPE '\')
              AND (?2 = 0 OR is_active = 1)
            ORDER BY name COLLATE NOCASE ASC, id ASC
            "#,
            WORKER_COLUMNS
        ))
        .bind(pattern)
        .bind(active_only)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(worker_from_row).collect()
    }

    /// Update directory fields. The advance balance is only ever moved by
    /// [`WorkerRepository::adjust_balance_in`].
    pub async fn update_worker(&self, worker: &Worker) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE workers
            SET name = ?, phone = ?, daily_rate = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&worker.name)
        .bind(&worker.phone)
        .bind(worker.daily_rate)
        .bind(worker.is_active)
        .bind(&worker.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Hard delete. Returns false when no such worker existed.
    pub async fn delete_worker(&self, worker_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workers WHERE id = ?")
            .bind(worker_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomic `advance_balance += delta`
    pub async fn adjust_balance_in(conn: &mut SqliteConnection, worker_id: &str, delta: f64) -> Result<()> {
        let result = sqlx::query("UPDATE workers SET advance_balance = advance_balance + ? WHERE id = ?")
            .bind(delta)
            .bind(worker_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("Worker not found: {}", worker_id));
        }
        Ok(())
    }

    pub async fn get_balance_in(conn: &mut SqliteConnection, worker_id: &str) -> Result<Option<f64>> {
        let balance = sqlx::query_scalar::<_, f64>("SELECT advance_balance FROM workers WHERE id = ?")
            .bind(worker_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(balance)
    }

    pub async fn count_active(&self) -> Result<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workers WHERE is_active = 1")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count as u32)
    }

    /// Workers owing the most, largest balance first
    pub async fn top_advance_balances(&self, limit: u32) -> Result<Vec<Worker>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM workers
            WHERE advance_balance > 0
            ORDER BY advance_balance DESC, name ASC
            LIMIT ?
            "#,
            WORKER_COLUMNS
        ))
        .bind(limit as i64)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(worker_from_row).collect()
    }
}

fn worker_from_row(row: &SqliteRow) -> Result<Worker> {
    let created_at: String = row.try_get("created_at")?;
    Ok(Worker {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        daily_rate: row.try_get("daily_rate")?,
        advance_balance: row.try_get("advance_balance")?,
        is_active: row.try_get("is_active")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
