use anyhow::{anyhow, Result};
use log::{info, warn};
use sqlx::{migrate::MigrateDatabase, pool::PoolConnection, Sqlite, SqliteConnection, SqlitePool};
use std::sync::Arc;

/// DbConnection owns the SQLite pool shared by every repository
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and make sure the
    /// schema exists
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a transaction that holds the database write lock from its first
    /// statement. A second writer waits for the lock (up to the busy timeout)
    /// instead of failing when it upgrades from reading to writing.
    pub async fn begin_immediate(&self) -> Result<WriteTransaction> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(WriteTransaction { conn: Some(conn) })
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS workers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                daily_rate REAL NOT NULL,
                advance_balance REAL NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS attendance (
                id TEXT PRIMARY KEY,
                worker_id TEXT NOT NULL,
                week_start TEXT NOT NULL,
                mon REAL NOT NULL DEFAULT 0,
                tue REAL NOT NULL DEFAULT 0,
                wed REAL NOT NULL DEFAULT 0,
                thu REAL NOT NULL DEFAULT 0,
                fri REAL NOT NULL DEFAULT 0,
                sat REAL NOT NULL DEFAULT 0,
                sun REAL NOT NULL DEFAULT 0,
                cumulative_advance REAL NOT NULL DEFAULT 0,
                cumulative_recovery REAL NOT NULL DEFAULT 0,
                settled BOOLEAN NOT NULL DEFAULT FALSE,
                updated_at TEXT NOT NULL,
                UNIQUE (worker_id, week_start)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_attendance_week_start
            ON attendance(week_start);
            "#,
        )
        .execute(pool)
        .await?;

        // One payment per worker-week
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                id TEXT PRIMARY KEY,
                worker_id TEXT NOT NULL,
                week_start TEXT NOT NULL,
                gross_amount REAL NOT NULL,
                advance_recovered REAL NOT NULL,
                advance_given REAL NOT NULL,
                net_paid REAL NOT NULL,
                balance_after REAL NOT NULL,
                paid_at TEXT NOT NULL,
                UNIQUE (worker_id, week_start)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_payments_paid_at
            ON payments(paid_at);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admins (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                salt TEXT NOT NULL,
                iterations INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// An open `BEGIN IMMEDIATE` transaction on a pooled connection.
///
/// Dropping it without `commit` closes the connection instead of returning
/// it to the pool, and SQLite rolls the transaction back on close.
pub struct WriteTransaction {
    conn: Option<PoolConnection<Sqlite>>,
}

impl WriteTransaction {
    pub fn conn(&mut self) -> Result<&mut SqliteConnection> {
        self.conn
            .as_deref_mut()
            .ok_or_else(|| anyhow!("Transaction already finished"))
    }

    pub async fn commit(mut self) -> Result<()> {
        self.finish("COMMIT").await
    }

    pub async fn rollback(mut self) -> Result<()> {
        self.finish("ROLLBACK").await
    }

    async fn finish(&mut self, statement: &str) -> Result<()> {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = sqlx::query(statement).execute(&mut *conn).await {
                warn!("{} failed, discarding connection: {}", statement, e);
                drop(conn.detach());
                return Err(e.into());
            }
        }
        Ok(())
    }
}

impl Drop for WriteTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            drop(conn.detach());
        }
    }
}
