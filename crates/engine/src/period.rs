//! Calendar month used to scope queries and aggregation.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidDate(format!(
                "invalid month {year}-{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month a date belongs to.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month (inclusive bound of the month's date range).
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    #[must_use]
    pub fn next(self) -> Self {
        self.shift(1)
    }

    #[must_use]
    pub fn prev(self) -> Self {
        self.shift(-1)
    }

    fn shift(self, months: i32) -> Self {
        let first = self.first_day();
        let shifted = if months >= 0 {
            first.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            first.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted.map(Self::containing).unwrap_or(self)
    }

    /// Cache/file key, `yyyy-MM`.
    #[must_use]
    pub fn key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Display label, `MMMM yyyy`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_cover_the_whole_month() {
        let feb = Period::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), date(2024, 2, 1));
        assert_eq!(feb.last_day(), date(2024, 2, 29));
        assert!(feb.contains(date(2024, 2, 29)));
        assert!(!feb.contains(date(2024, 3, 1)));
    }

    #[test]
    fn navigation_wraps_years() {
        let dec = Period::new(2023, 12).unwrap();
        assert_eq!(dec.next(), Period::new(2024, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
        assert_eq!(dec.last_day(), date(2023, 12, 31));
    }

    #[test]
    fn key_and_label() {
        let period = Period::containing(date(2024, 3, 9));
        assert_eq!(period.key(), "2024-03");
        assert_eq!(period.label(), "March 2024");
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(Period::new(2024, 13).is_err());
        assert!(Period::new(2024, 0).is_err());
    }
}
