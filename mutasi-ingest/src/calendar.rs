//! Working-year tracking across a statement period.
//!
//! Rows only carry DD/MM. A statement covering December and January needs the
//! year bumped exactly once, on the first January row after a December row.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static LEADING_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})").expect("valid leading-date regex"));

/// Day and month of a line that starts with `DD/MM`.
pub fn leading_day_month(line: &str) -> Option<(u32, u32)> {
    let caps = LEADING_DATE.captures(line)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    Some((day, month))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearTracker {
    year: i32,
    last_month: u32,
}

impl YearTracker {
    pub fn new(start_year: i32) -> Self {
        Self {
            year: start_year,
            last_month: 0,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Record the month of the next row and return the year it belongs to.
    pub fn observe(&mut self, month: u32) -> i32 {
        if self.last_month == 12 && month == 1 {
            self.year += 1;
        }
        if month > 0 {
            self.last_month = month;
        }
        self.year
    }
}

/// Resolve `DD/MM` against a year. Impossible dates (31/02, 00/13) give `None`.
pub fn resolve_date(day: u32, month: u32, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollover_increments_once() {
        let mut t = YearTracker::new(2024);
        assert_eq!(t.observe(12), 2024);
        assert_eq!(t.observe(12), 2024);
        assert_eq!(t.observe(1), 2025);
        assert_eq!(t.observe(1), 2025);
        assert_eq!(t.observe(2), 2025);
    }

    #[test]
    fn test_no_rollover_without_december() {
        let mut t = YearTracker::new(2024);
        assert_eq!(t.observe(11), 2024);
        assert_eq!(t.observe(1), 2024);
    }

    #[test]
    fn test_zero_month_does_not_reset_tracking() {
        let mut t = YearTracker::new(2024);
        t.observe(12);
        t.observe(0);
        assert_eq!(t.observe(1), 2025);
    }

    #[test]
    fn test_leading_day_month() {
        assert_eq!(leading_day_month("31/12 BUNGA 1,234.00"), Some((31, 12)));
        assert_eq!(leading_day_month("KETERANGAN"), None);
    }

    #[test]
    fn test_resolve_date_rejects_impossible() {
        assert!(resolve_date(31, 2, 2024).is_none());
        assert!(resolve_date(1, 13, 2024).is_none());
        assert_eq!(
            resolve_date(29, 2, 2024),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }
}
