//! ISO calendar-date helpers for the trailing-window queries every page issues.

use anyhow::{ensure, Result};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Current calendar date, local clock, `YYYY-MM-DD`.
pub fn iso_today() -> String {
    iso(local_today())
}

/// Calendar date `n` days before today, `YYYY-MM-DD`.
pub fn iso_days_ago(n: u32) -> String {
    iso_days_ago_from(local_today(), n)
}

/// Deterministic core of [`iso_days_ago`]: fix `today` and the result is pure.
pub fn iso_days_ago_from(today: NaiveDate, n: u32) -> String {
    iso(today - Duration::days(i64::from(n)))
}

/// Inclusive `[from, to]` window of ISO dates. Invariant: `from <= to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: String,
    pub to: String,
}

impl TimeWindow {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self> {
        let (from, to) = (from.into(), to.into());
        // ISO dates order lexicographically, so a string compare is the
        // calendar compare.
        ensure!(from <= to, "time window inverted: {} > {}", from, to);
        Ok(Self { from, to })
    }

    /// Window ending today and starting `n` days earlier.
    pub fn trailing_days(n: u32) -> Self {
        Self { from: iso_days_ago(n), to: iso_today() }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn zero_days_ago_is_today() {
        assert_eq!(iso_days_ago_from(d(2024, 6, 15), 0), "2024-06-15");
    }

    #[test]
    fn crosses_month_and_year_boundary() {
        assert_eq!(iso_days_ago_from(d(2024, 1, 2), 5), "2023-12-28");
    }

    #[test]
    fn respects_leap_day() {
        assert_eq!(iso_days_ago_from(d(2024, 3, 1), 1), "2024-02-29");
        assert_eq!(iso_days_ago_from(d(2023, 3, 1), 1), "2023-02-28");
    }

    #[test]
    fn thirty_day_window() {
        assert_eq!(iso_days_ago_from(d(2026, 8, 30), 30), "2026-07-31");
    }

    #[test]
    fn live_helpers_agree_with_pure_core() {
        // iso_today / iso_days_ago read the same clock, so n = 0 must match.
        assert_eq!(iso_days_ago(0), iso_today());
    }

    #[test]
    fn window_rejects_inverted_range() {
        assert!(TimeWindow::new("2024-02-01", "2024-01-01").is_err());
        let w = TimeWindow::new("2024-01-01", "2024-02-01").unwrap();
        assert_eq!(w.from, "2024-01-01");
    }

    #[test]
    fn trailing_window_is_ordered() {
        let w = TimeWindow::trailing_days(30);
        assert!(w.from <= w.to);
    }
}
