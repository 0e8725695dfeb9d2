pub mod admin_repository;
pub mod attendance_repository;
pub mod payment_repository;
pub mod worker_repository;

pub use admin_repository::AdminRepository;
pub use attendance_repository::AttendanceRepository;
pub use payment_repository::PaymentRepository;
pub use worker_repository::WorkerRepository;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::backend::domain::models::week::WeekKey;

/// Fixed-width RFC 3339 so stored timestamps sort as text
pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid stored timestamp '{}'", value))?
        .with_timezone(&Utc))
}

pub(crate) fn parse_week(value: &str) -> Result<WeekKey> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid stored week_start '{}'", value))?;
    Ok(WeekKey::containing(date))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
