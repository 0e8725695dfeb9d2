//! Calendar keys for ledger rows: the Monday-based week and the month.
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

use crate::backend::domain::errors::{LedgerError, LedgerResult};

/// Monday of a week. Ledger and payment rows are keyed by this date.
///
/// Working with a calendar date rather than a timestamp means no time of
/// day or timezone can shift a week onto its neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// The week that contains `date`
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        Self(date - Duration::days(offset))
    }

    /// Parse `YYYY-MM-DD` (anything after a `T` is ignored) and normalise
    /// it to the Monday of its week.
    pub fn parse(input: &str) -> LedgerResult<Self> {
        let date_part = input.trim().split('T').next().unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|_| LedgerError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", input)))?;
        Ok(Self::containing(date))
    }

    pub fn monday(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A calendar month, written `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn parse(input: &str) -> LedgerResult<Self> {
        let invalid = || LedgerError::validation(format!("Invalid month '{}', expected YYYY-MM", input));

        let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self { year, month })
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_key_normalises_to_monday() {
        // 2024-06-03 is a Monday
        let monday = WeekKey::containing(date(2024, 6, 3));
        assert_eq!(monday.monday(), date(2024, 6, 3));

        assert_eq!(WeekKey::containing(date(2024, 6, 5)), monday);
        assert_eq!(WeekKey::containing(date(2024, 6, 9)), monday); // Sunday
        assert_ne!(WeekKey::containing(date(2024, 6, 10)), monday);
    }

    #[test]
    fn test_week_key_parse() {
        assert_eq!(WeekKey::parse("2024-06-06").unwrap().to_string(), "2024-06-03");
        assert_eq!(
            WeekKey::parse("2024-06-09T23:30:00.000Z").unwrap().to_string(),
            "2024-06-03"
        );
        // Week spanning a month boundary
        assert_eq!(WeekKey::parse("2024-09-01").unwrap().to_string(), "2024-08-26");

        assert!(WeekKey::parse("").is_err());
        assert!(WeekKey::parse("06/03/2024").is_err());
        assert!(WeekKey::parse("2024-02-30").is_err());
    }

    #[test]
    fn test_month_key_bounds() {
        let june = MonthKey::parse("2024-06").unwrap();
        assert_eq!(june.first_day(), date(2024, 6, 1));
        assert_eq!(june.last_day(), date(2024, 6, 30));
        assert_eq!(june.to_string(), "2024-06");

        let february = MonthKey::parse("2024-02").unwrap();
        assert_eq!(february.last_day(), date(2024, 2, 29));

        let december = MonthKey::parse("2023-12").unwrap();
        assert_eq!(december.last_day(), date(2023, 12, 31));
    }

    #[test]
    fn test_month_key_rejects_malformed() {
        assert!(MonthKey::parse("2024-13").is_err());
        assert!(MonthKey::parse("2024-6").is_err());
        assert!(MonthKey::parse("June").is_err());
        assert!(MonthKey::parse("2024-00").is_err());
    }
}
