//! Weekly attendance ledger rows and the deltas applied to them.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::week::WeekKey;
use crate::backend::domain::errors::{LedgerError, LedgerResult};

/// Units worked per day, usually 0, 0.5 or 1. The range is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeekDays {
    pub mon: f64,
    pub tue: f64,
    pub wed: f64,
    pub thu: f64,
    pub fri: f64,
    pub sat: f64,
    pub sun: f64,
}

impl WeekDays {
    pub fn values(&self) -> [f64; 7] {
        [self.mon, self.tue, self.wed, self.thu, self.fri, self.sat, self.sun]
    }

    pub fn total(&self) -> f64 {
        self.values().iter().sum()
    }

    /// Replace NaN and infinities with zero
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            mon: clean(self.mon),
            tue: clean(self.tue),
            wed: clean(self.wed),
            thu: clean(self.thu),
            fri: clean(self.fri),
            sat: clean(self.sat),
            sun: clean(self.sun),
        }
    }
}

/// Cash handed out and recovered in one submission.
///
/// Both halves are non-negative, so cumulative totals only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttendanceDelta {
    pub advance: f64,
    pub recovery: f64,
}

impl AttendanceDelta {
    pub fn new(advance: f64, recovery: f64) -> LedgerResult<Self> {
        let advance = if advance.is_finite() { advance } else { 0.0 };
        let recovery = if recovery.is_finite() { recovery } else { 0.0 };

        if advance < 0.0 {
            return Err(LedgerError::validation("Advance cannot be negative"));
        }
        if recovery < 0.0 {
            return Err(LedgerError::validation("Recovery cannot be negative"));
        }

        Ok(Self { advance, recovery })
    }

    /// Effect on the worker's owed balance
    pub fn balance_change(&self) -> f64 {
        self.advance - self.recovery
    }
}

/// One worker's attendance for one week.
///
/// Once `settled` is set the row is frozen; storage refuses further edits.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub id: String,
    pub worker_id: String,
    pub week: WeekKey,
    pub days: WeekDays,
    pub cumulative_advance: f64,
    pub cumulative_recovery: f64,
    pub settled: bool,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn generate_id() -> String {
        format!("attendance::{}", Uuid::new_v4().simple())
    }

    pub fn total_days(&self) -> f64 {
        self.days.total()
    }
}
