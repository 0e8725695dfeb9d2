use anyhow::Result;
use sqlx::{sqlite::SqliteRow, Row};

use super::{format_timestamp, parse_timestamp};
use crate::backend::domain::models::admin::Admin;
use crate::backend::storage::connection::DbConnection;

/// Repository for admin accounts
#[derive(Clone)]
pub struct AdminRepository {
    db: DbConnection,
}

impl AdminRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_admin(&self, admin: &Admin) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO admins (id, username, password_hash, salt, iterations, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&admin.id)
        .bind(&admin.username)
        .bind(&admin.password_hash)
        .bind(&admin.salt)
        .bind(admin.iterations as i64)
        .bind(format_timestamp(&admin.created_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, salt, iterations, created_at
            FROM admins
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(admin_from_row).transpose()
    }

    pub async fn count_admins(&self) -> Result<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count as u32)
    }
}

fn admin_from_row(row: &SqliteRow) -> Result<Admin> {
    let iterations: i64 = row.try_get("iterations")?;
    let created_at: String = row.try_get("created_at")?;
    Ok(Admin {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        salt: row.try_get("salt")?,
        iterations: u32::try_from(iterations)?,
        created_at: parse_timestamp(&created_at)?,
    })
}
