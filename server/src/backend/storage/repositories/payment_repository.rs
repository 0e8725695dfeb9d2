use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::{format_timestamp, parse_timestamp, parse_week};
use crate::backend::domain::models::payment::PaymentRecord;
use crate::backend::domain::models::week::WeekKey;
use crate::backend::storage::connection::DbConnection;

const PAYMENT_COLUMNS: &str = "id, worker_id, week_start, gross_amount, advance_recovered, \
     advance_given, net_paid, balance_after, paid_at";

/// Repository for the append-only payment journal
#[derive(Clone)]
pub struct PaymentRepository {
    db: DbConnection,
}

impl PaymentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Append a payment. The unique (worker_id, week_start) index rejects a
    /// second payment for the same week.
    pub async fn insert_in(conn: &mut SqliteConnection, payment: &PaymentRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, worker_id, week_start, gross_amount, advance_recovered,
                advance_given, net_paid, balance_after, paid_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.worker_id)
        .bind(payment.week.to_string())
        .bind(payment.gross_amount)
        .bind(payment.advance_recovered)
        .bind(payment.advance_given)
        .bind(payment.net_paid)
        .bind(payment.balance_after)
        .bind(format_timestamp(&payment.paid_at))
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn get_payment(&self, worker_id: &str, week: WeekKey) -> Result<Option<PaymentRecord>> {
        let mut conn = self.db.pool().acquire().await?;
        Self::get_payment_in(&mut conn, worker_id, week).await
    }

    pub async fn get_payment_in(
        conn: &mut SqliteConnection,
        worker_id: &str,
        week: WeekKey,
    ) -> Result<Option<PaymentRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM payments WHERE worker_id = ? AND week_start = ?",
            PAYMENT_COLUMNS
        ))
        .bind(worker_id)
        .bind(week.to_string())
        .fetch_optional(&mut *conn)
        .await?;

        row.as_ref().map(payment_from_row).transpose()
    }

    /// A worker's payments, newest week first
    pub async fn list_for_worker(&self, worker_id: &str) -> Result<Vec<PaymentRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM payments WHERE worker_id = ? ORDER BY week_start DESC",
            PAYMENT_COLUMNS
        ))
        .bind(worker_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(payment_from_row).collect()
    }

    pub async fn count_for(&self, worker_id: &str, week: WeekKey) -> Result<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE worker_id = ? AND week_start = ?")
            .bind(worker_id)
            .bind(week.to_string())
            .fetch_one(self.db.pool())
            .await?;
        Ok(count as u32)
    }

    /// Total net paid by settlements recorded at or after `since`
    pub async fn sum_net_paid_since(&self, since: DateTime<Utc>) -> Result<f64> {
        let total: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(net_paid), 0.0) FROM payments WHERE paid_at >= ?")
            .bind(format_timestamp(&since))
            .fetch_one(self.db.pool())
            .await?;
        Ok(total)
    }
}

fn payment_from_row(row: &SqliteRow) -> Result<PaymentRecord> {
    let week_start: String = row.try_get("week_start")?;
    let paid_at: String = row.try_get("paid_at")?;
    Ok(PaymentRecord {
        id: row.try_get("id")?,
        worker_id: row.try_get("worker_id")?,
        week: parse_week(&week_start)?,
        gross_amount: row.try_get("gross_amount")?,
        advance_recovered: row.try_get("advance_recovered")?,
        advance_given: row.try_get("advance_given")?,
        net_paid: row.try_get("net_paid")?,
        balance_after: row.try_get("balance_after")?,
        paid_at: parse_timestamp(&paid_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::test_utils::TestDb;
    use chrono::{Duration, TimeZone};

    fn payment(worker_id: &str, week: &str, net: f64, paid_at: DateTime<Utc>) -> PaymentRecord {
        PaymentRecord {
            id: PaymentRecord::generate_id(),
            worker_id: worker_id.to_string(),
            week: WeekKey::parse(week).unwrap(),
            gross_amount: net,
            advance_recovered: 0.0,
            advance_given: 0.0,
            net_paid: net,
            balance_after: 0.0,
            paid_at,
        }
    }

    async fn setup_test() -> (TestDb, PaymentRepository) {
        let test_db = TestDb::new().await;
        let repo = PaymentRepository::new(test_db.db.clone());
        (test_db, repo)
    }

    #[tokio::test]
    async fn test_insert_and_get_payment() {
        let (test_db, repo) = setup_test().await;
        let record = payment("w1", "2024-06-03", 2150.0, Utc::now());

        let mut conn = test_db.db.pool().acquire().await.unwrap();
        PaymentRepository::insert_in(&mut conn, &record).await.expect("Failed to insert payment");

        let loaded = repo.get_payment("w1", record.week).await.unwrap().expect("Payment should exist");
        assert_eq!(loaded.id, record.id);
        assert_eq!(loaded.net_paid, 2150.0);
        assert_eq!(repo.count_for("w1", record.week).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_second_payment_for_week_is_rejected() {
        let (test_db, repo) = setup_test().await;
        let mut conn = test_db.db.pool().acquire().await.unwrap();

        PaymentRepository::insert_in(&mut conn, &payment("w1", "2024-06-03", 100.0, Utc::now()))
            .await
            .unwrap();
        let duplicate = payment("w1", "2024-06-07", 100.0, Utc::now());
        assert!(PaymentRepository::insert_in(&mut conn, &duplicate).await.is_err());

        assert_eq!(repo.count_for("w1", duplicate.week).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sum_net_paid_since() {
        let (test_db, repo) = setup_test().await;
        let monday = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        let mut conn = test_db.db.pool().acquire().await.unwrap();

        for record in [
            payment("w1", "2024-06-03", 1000.0, monday - Duration::hours(1)),
            payment("w2", "2024-06-03", 500.0, monday),
            payment("w1", "2024-06-10", 250.0, monday + Duration::days(2)),
        ] {
            PaymentRepository::insert_in(&mut conn, &record).await.unwrap();
        }

        assert_eq!(repo.sum_net_paid_since(monday).await.unwrap(), 750.0);
        assert_eq!(repo.sum_net_paid_since(monday + Duration::days(7)).await.unwrap(), 0.0);

        let history = repo.list_for_worker("w1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].week.to_string(), "2024-06-10");
    }
}
