use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerant parsing for numeric form input.
///
/// Attendance sheets are filled in by hand, so amounts and day values may
/// arrive as JSON numbers, numeric strings, empty strings or `null`.
/// Anything that does not parse to a finite number is treated as zero.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Parse a user-entered amount, falling back to zero.
    pub fn parse_amount(input: &str) -> f64 {
        input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }

    /// `deserialize_with` helper for `f64` fields fed from forms.
    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
            Some(Value::String(s)) => parse_amount(&s),
            _ => 0.0,
        })
    }

    /// Like [`number`] for optional fields: absent, `null` or blank input
    /// means "not given", anything else is parsed the same way.
    pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::Number(n)) => Some(n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0)),
            Some(Value::String(s)) => Some(parse_amount(&s)),
            Some(_) => Some(0.0),
        })
    }
}

/// A worker on the site payroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// Pay for one full day of work
    pub daily_rate: f64,
    /// Outstanding advance; positive means the worker owes the site
    pub advance_balance: f64,
    pub is_active: bool,
    /// RFC 3339 timestamp
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWorkerRequest {
    pub name: String,
    pub phone: String,
    #[serde(deserialize_with = "lenient::number")]
    pub daily_rate: f64,
    /// Opening advance balance carried over from before the ledger existed
    #[serde(default, deserialize_with = "lenient::number")]
    pub opening_balance: f64,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateWorkerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub daily_rate: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub worker: Worker,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerListResponse {
    pub workers: Vec<Worker>,
}

/// Query parameters for listing workers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkerListRequest {
    /// Case-insensitive match on name or phone
    pub search: Option<String>,
    #[serde(default)]
    pub active_only: bool,
}

/// Day units worked in one week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WeekDays {
    #[serde(default, deserialize_with = "lenient::number")]
    pub mon: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub tue: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub wed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub thu: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fri: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sat: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sun: f64,
}

/// One worker's ledger row for one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub id: String,
    pub worker_id: String,
    /// Monday of the week (YYYY-MM-DD)
    pub week_start: String,
    pub days: WeekDays,
    pub total_days: f64,
    pub cumulative_advance: f64,
    pub cumulative_recovery: f64,
    pub settled: bool,
    pub updated_at: String,
}

/// Attendance and advance/recovery deltas for a single worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceInput {
    pub worker_id: String,
    #[serde(default)]
    pub days: WeekDays,
    #[serde(default, deserialize_with = "lenient::number")]
    pub advance: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub recovery: f64,
}

/// Save the whole site's attendance sheet for a week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordAttendanceRequest {
    /// Any date inside the week; normalised to its Monday
    pub week_start: String,
    pub entries: Vec<AttendanceInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedAttendance {
    pub worker_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordAttendanceResponse {
    pub week_start: String,
    pub saved: Vec<AttendanceEntry>,
    /// Workers whose week was already paid; their rows were left untouched
    pub skipped_settled: Vec<String>,
    pub rejected: Vec<RejectedAttendance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSheetRow {
    pub worker: Worker,
    pub entry: Option<AttendanceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSheetResponse {
    pub week_start: String,
    pub rows: Vec<WeekSheetRow>,
}

/// Query parameter carrying a date inside the week of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeekRequest {
    pub date: Option<String>,
}

/// Query parameter carrying a calendar month (YYYY-MM)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MonthRequest {
    pub month: Option<String>,
}

/// Settle one worker's week, optionally saving last-minute changes first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleRequest {
    pub worker_id: String,
    pub week_start: String,
    #[serde(default)]
    pub days: Option<WeekDays>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub advance: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub recovery: f64,
}

/// Immutable settlement record for one worker-week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub worker_id: String,
    pub week_start: String,
    pub gross_amount: f64,
    /// Cumulative recovery deducted for the week
    pub advance_recovered: f64,
    /// Cumulative advance handed out during the week
    pub advance_given: f64,
    pub net_paid: f64,
    /// Worker's advance balance right after settlement
    pub balance_after: f64,
    pub paid_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleResponse {
    pub payment: PaymentRecord,
    /// False when the week had already been paid and nothing changed
    pub newly_settled: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "PAID")]
    Paid,
    #[serde(rename = "Pending")]
    Pending,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "PAID"),
            PaymentStatus::Pending => write!(f, "Pending"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SiteTotals {
    pub gross: f64,
    pub recovered: f64,
    pub advance_given: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReportRow {
    pub worker_id: String,
    pub name: String,
    pub daily_rate: f64,
    pub total_days: f64,
    pub gross: f64,
    pub recovered: f64,
    pub advance_given: f64,
    pub net: f64,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub week_start: String,
    pub rows: Vec<WeeklyReportRow>,
    pub site_total: SiteTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReportRow {
    pub worker_id: String,
    pub name: String,
    pub total_days: f64,
    pub total_gross: f64,
    pub total_recovered: f64,
    pub total_advance_given: f64,
    pub total_net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// YYYY-MM
    pub month: String,
    pub rows: Vec<MonthlyReportRow>,
    pub site_total: SiteTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub week_start: String,
    pub active_workers: u32,
    /// Net paid out by settlements recorded since this Monday
    pub total_payout: f64,
    /// Advances handed out in the current week
    pub total_advances: f64,
    pub paid_count: u32,
    pub unpaid_count: u32,
    /// Workers with the largest outstanding advances
    pub top_advance_balances: Vec<Worker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub worker: Worker,
    pub payments: Vec<PaymentRecord>,
    pub attendance: Vec<AttendanceEntry>,
    pub total_earned: f64,
    pub total_paid: f64,
    pub total_advances: f64,
    /// Net owed for weeks that have not been settled yet
    pub pending_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub username: String,
    pub expires_at: String,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
