//! Typed reporting periods.
//!
//! BACEN reports are keyed by a year-month integer (`YYYYMM`). The ETL derives
//! a calendar month ([`chrono::NaiveDate`], first day of the month) and a
//! [`Quarter`] from it; query-time selections are expressed in quarters.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::BacenError;

/// A calendar quarter, e.g. `2024Q3`.
///
/// Orders chronologically and round-trips through its display form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quarter {
    year: i32,
    quarter: u8,
}

impl Quarter {
    /// Creates a quarter from a year and a quarter number (1-4).
    ///
    /// Returns `None` if `quarter` is outside 1-4.
    #[must_use]
    pub const fn new(year: i32, quarter: u8) -> Option<Self> {
        if matches!(quarter, 1..=4) {
            Some(Self { year, quarter })
        } else {
            None
        }
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the quarter number (1-4).
    #[must_use]
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }
}

impl From<NaiveDate> for Quarter {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month0() / 3) as u8 + 1,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

impl FromStr for Quarter {
    type Err = BacenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || BacenError::Parse(format!("invalid quarter: {s:?}"));
        let (year, quarter) = s.split_once(['Q', 'q']).ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let quarter: u8 = quarter.parse().map_err(|_| err())?;
        Self::new(year, quarter).ok_or_else(err)
    }
}

/// Parses a `YYYYMM` period integer into the first day of that month.
///
/// Returns `None` for months outside 1-12 or years a calendar cannot hold.
#[must_use]
pub fn parse_year_month(period: u32) -> Option<NaiveDate> {
    let year = (period / 100) as i32;
    let month = period % 100;
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert_eq!(Quarter::from(date), Quarter::new(2024, 3).unwrap());

        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(Quarter::from(date), Quarter::new(2024, 4).unwrap());

        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(Quarter::from(date), Quarter::new(2024, 1).unwrap());
    }

    #[test]
    fn test_quarter_display_round_trip() {
        let q = Quarter::new(2024, 3).unwrap();
        assert_eq!(q.to_string(), "2024Q3");
        assert_eq!("2024Q3".parse::<Quarter>().unwrap(), q);
    }

    #[test]
    fn test_quarter_rejects_out_of_range() {
        assert!(Quarter::new(2024, 0).is_none());
        assert!(Quarter::new(2024, 5).is_none());
        assert!("2024Q5".parse::<Quarter>().is_err());
        assert!("banana".parse::<Quarter>().is_err());
    }

    #[test]
    fn test_quarter_ordering() {
        let q1: Quarter = "2023Q4".parse().unwrap();
        let q2: Quarter = "2024Q1".parse().unwrap();
        let q3: Quarter = "2024Q3".parse().unwrap();
        assert!(q1 < q2);
        assert!(q2 < q3);
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(
            parse_year_month(202_409),
            NaiveDate::from_ymd_opt(2024, 9, 1)
        );
        assert_eq!(parse_year_month(202_413), None);
        assert_eq!(parse_year_month(202_400), None);
    }
}
