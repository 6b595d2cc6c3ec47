//! Calendar periods and date-bounded row filtering

use crate::error::ReportError;
use crate::submission::SubmissionRow;
use chrono::{Datelike, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month; `month0` is zero-based (0 = January)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month0: u32,
}

impl YearMonth {
    /// Create from a year and zero-based month, `None` if the month is out of range
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        (month0 < 12).then_some(Self { year, month0 })
    }

    /// Month containing the given date
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self { year: date.year(), month0: date.month0() }
    }

    /// The immediately preceding calendar month (December of the prior year for January)
    pub fn previous(self) -> Self {
        if self.month0 == 0 {
            Self { year: self.year - 1, month0: 11 }
        } else {
            Self { year: self.year, month0: self.month0 - 1 }
        }
    }

    /// One-based month number (1 = January)
    pub fn month_number(self) -> u32 {
        self.month0 + 1
    }

    /// Whether the date falls in this month
    pub fn contains(self, date: &NaiveDateTime) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month_number())
    }
}

/// Parses `YYYY-MM` with a one-based month, e.g. `2025-01` for January
impl FromStr for YearMonth {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReportError::InvalidValue { field: "year-month", value: s.to_string() };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if month == 0 {
            return Err(invalid());
        }
        YearMonth::new(year, month - 1).ok_or_else(invalid)
    }
}

/// Rows kept by a date filter plus the count dropped for unparseable dates
#[derive(Debug, Clone, Default)]
pub struct FilteredRows<'a> {
    pub rows: Vec<&'a SubmissionRow>,
    pub skipped_rows: usize,
}

impl<'a> FilteredRows<'a> {
    /// Every row, nothing skipped
    pub fn all(rows: &'a [SubmissionRow]) -> Self {
        Self { rows: rows.iter().collect(), skipped_rows: 0 }
    }

    fn partition<F>(rows: &'a [SubmissionRow], keep: F) -> Self
    where
        F: Fn(&NaiveDateTime) -> bool,
    {
        let mut filtered = Self::default();
        for row in rows {
            match row.submitted_at() {
                Some(date) if keep(&date) => filtered.rows.push(row),
                Some(_) => {}
                None => filtered.skipped_rows += 1,
            }
        }
        if filtered.skipped_rows > 0 {
            warn!("{} rows skipped for unparseable submit dates", filtered.skipped_rows);
        }
        filtered
    }
}

/// Keep rows submitted in the target month
///
/// With no target every row matches and none are skipped.
pub fn filter_by_month(rows: &[SubmissionRow], target: Option<YearMonth>) -> FilteredRows<'_> {
    match target {
        None => FilteredRows::all(rows),
        Some(month) => FilteredRows::partition(rows, |date| month.contains(date)),
    }
}

/// Keep rows submitted within `[from, to]`, both ends inclusive
///
/// Dates are compared as naive local date-times; no timezone adjustment is made.
pub fn filter_by_range(rows: &[SubmissionRow], from: NaiveDateTime, to: NaiveDateTime) -> FilteredRows<'_> {
    FilteredRows::partition(rows, |date| *date >= from && *date <= to)
}
