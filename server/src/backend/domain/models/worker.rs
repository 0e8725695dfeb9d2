//! Domain model for a worker on the site payroll.
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub daily_rate: f64,
    /// Positive when the worker owes the site money
    pub advance_balance: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Worker {
    pub fn generate_id() -> String {
        format!("worker::{}", Uuid::new_v4().simple())
    }
}
