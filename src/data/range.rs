//! Date range model and day-by-day expansion
//!
//! A range is half-open: `[start, end)`. Ranges longer than
//! [`MAX_RANGE_DAYS`] or with `start >= end` are never fetched.

use chrono::{Duration, NaiveDate};

/// Longest span, in days, that may be fetched in one batch
pub const MAX_RANGE_DAYS: i64 = 14;

/// A picked pair of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days`-long range ending at `end`
    ///
    /// Falls back to a single-day range if `end - days` underflows the
    /// supported calendar.
    pub fn ending_at(end: NaiveDate, days: i64) -> Self {
        let start = end
            .checked_sub_signed(Duration::days(days))
            .or_else(|| end.pred_opt())
            .unwrap_or(end);
        Self { start, end }
    }

    /// Signed number of days from start to end
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Whether this range may be fetched: `start < end` and at most 14 days
    pub fn is_fetchable(&self) -> bool {
        self.start < self.end && self.span_days() <= MAX_RANGE_DAYS
    }

    /// Dates to request for this range, or nothing if it is not fetchable
    pub fn fetch_dates(&self) -> Vec<NaiveDate> {
        if !self.is_fetchable() {
            return Vec::new();
        }
        expand(self.start, self.end)
    }
}

/// Expands `[start, end)` into ascending calendar dates
///
/// Performs no validation; `start >= end` yields an empty vector.
pub fn expand(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;

    while current < end {
        dates.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expand_three_day_range() {
        let dates = expand(date(2023, 1, 1), date(2023, 1, 4));
        assert_eq!(
            dates,
            vec![date(2023, 1, 1), date(2023, 1, 2), date(2023, 1, 3)]
        );
    }

    #[test]
    fn test_expand_yields_span_strictly_ascending_dates() {
        for span in 1..=MAX_RANGE_DAYS {
            let start = date(2023, 3, 20);
            let end = start + Duration::days(span);
            let dates = expand(start, end);

            assert_eq!(dates.len() as i64, span);
            assert_eq!(dates.first(), Some(&start));
            assert_eq!(dates.last(), Some(&(start + Duration::days(span - 1))));
            assert!(dates.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_expand_crosses_month_boundary() {
        let dates = expand(date(2023, 1, 30), date(2023, 2, 3));
        assert_eq!(
            dates,
            vec![
                date(2023, 1, 30),
                date(2023, 1, 31),
                date(2023, 2, 1),
                date(2023, 2, 2)
            ]
        );
    }

    #[test]
    fn test_expand_crosses_leap_day_and_year_end() {
        let leap = expand(date(2024, 2, 28), date(2024, 3, 1));
        assert_eq!(leap, vec![date(2024, 2, 28), date(2024, 2, 29)]);

        let year_end = expand(date(2023, 12, 31), date(2024, 1, 2));
        assert_eq!(year_end, vec![date(2023, 12, 31), date(2024, 1, 1)]);
    }

    #[test]
    fn test_expand_empty_when_start_not_before_end() {
        assert!(expand(date(2023, 1, 4), date(2023, 1, 4)).is_empty());
        assert!(expand(date(2023, 1, 5), date(2023, 1, 4)).is_empty());
    }

    #[test]
    fn test_fourteen_day_range_is_fetchable() {
        let range = DateRange::new(date(2023, 1, 1), date(2023, 1, 15));
        assert_eq!(range.span_days(), 14);
        assert!(range.is_fetchable());
        assert_eq!(range.fetch_dates().len(), 14);
    }

    #[test]
    fn test_fifteen_day_range_is_rejected() {
        let range = DateRange::new(date(2023, 1, 1), date(2023, 1, 16));
        assert!(!range.is_fetchable());
        assert!(range.fetch_dates().is_empty());
    }

    #[test]
    fn test_reversed_and_empty_ranges_are_rejected() {
        assert!(!DateRange::new(date(2023, 1, 4), date(2023, 1, 1)).is_fetchable());
        assert!(!DateRange::new(date(2023, 1, 4), date(2023, 1, 4)).is_fetchable());
        assert!(DateRange::new(date(2023, 1, 4), date(2023, 1, 1))
            .fetch_dates()
            .is_empty());
    }

    #[test]
    fn test_ending_at_builds_trailing_range() {
        let range = DateRange::ending_at(date(2023, 1, 15), MAX_RANGE_DAYS);
        assert_eq!(range.start, date(2023, 1, 1));
        assert_eq!(range.end, date(2023, 1, 15));
        assert!(range.is_fetchable());
    }
}
