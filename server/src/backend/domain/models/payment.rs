//! Pay arithmetic and the immutable payment journal record.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::attendance::LedgerEntry;
use super::week::WeekKey;

/// Pay figures derived from a ledger row at a given daily rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayCalculation {
    pub total_days: f64,
    pub gross: f64,
    pub recovered: f64,
    pub advance_given: f64,
    pub net: f64,
}

impl PayCalculation {
    /// `gross = total_days * daily_rate`, `net = gross - cumulative recovery`
    pub fn for_entry(entry: &LedgerEntry, daily_rate: f64) -> Self {
        let total_days = entry.total_days();
        let gross = total_days * daily_rate;
        Self {
            total_days,
            gross,
            recovered: entry.cumulative_recovery,
            advance_given: entry.cumulative_advance,
            net: gross - entry.cumulative_recovery,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: String,
    pub worker_id: String,
    pub week: WeekKey,
    pub gross_amount: f64,
    pub advance_recovered: f64,
    pub advance_given: f64,
    pub net_paid: f64,
    /// Worker's advance balance immediately after this settlement
    pub balance_after: f64,
    pub paid_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn generate_id() -> String {
        format!("payment::{}", Uuid::new_v4().simple())
    }

    pub fn from_settlement(
        entry: &LedgerEntry,
        pay: &PayCalculation,
        balance_after: f64,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::generate_id(),
            worker_id: entry.worker_id.clone(),
            week: entry.week,
            gross_amount: pay.gross,
            advance_recovered: pay.recovered,
            advance_given: pay.advance_given,
            net_paid: pay.net,
            balance_after,
            paid_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::attendance::WeekDays;

    #[test]
    fn test_pay_calculation() {
        let entry = LedgerEntry {
            id: LedgerEntry::generate_id(),
            worker_id: "worker::a".to_string(),
            week: WeekKey::parse("2024-06-03").unwrap(),
            days: WeekDays {
                mon: 1.0,
                tue: 1.0,
                wed: 1.0,
                thu: 0.0,
                fri: 1.0,
                sat: 0.5,
                sun: 0.0,
            },
            cumulative_advance: 200.0,
            cumulative_recovery: 100.0,
            settled: false,
            updated_at: Utc::now(),
        };

        let pay = PayCalculation::for_entry(&entry, 500.0);
        assert_eq!(pay.total_days, 4.5);
        assert_eq!(pay.gross, 2250.0);
        assert_eq!(pay.net, 2150.0);
        assert_eq!(pay.recovered, 100.0);
        assert_eq!(pay.advance_given, 200.0);

        let record = PaymentRecord::from_settlement(&entry, &pay, 100.0, Utc::now());
        assert_eq!(record.worker_id, "worker::a");
        assert_eq!(record.week, entry.week);
        assert_eq!(record.net_paid, 2150.0);
        assert_eq!(record.balance_after, 100.0);
    }
}
