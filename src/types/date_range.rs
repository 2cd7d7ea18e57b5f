//! Closed historical date ranges iterated by the enrichment driver.

use crate::config::ConfigError;
use chrono::NaiveDate;

/// An inclusive range of calendar dates.
///
/// Construction validates `start <= end`; iteration is always
/// ascending, which downstream consumers rely on for stable row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDateRange`] when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First date of the range (inclusive).
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the range (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// A one-date range is the smallest possible, so this is never true.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Ascending iterator over every date in the range, inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn iterates_ascending_inclusive() {
        let range = DateRange::new(d(2025, 6, 1), d(2025, 6, 5)).unwrap();
        let days: Vec<NaiveDate> = range.days().collect();
        assert_eq!(days.len(), 5);
        assert_eq!(days.first(), Some(&d(2025, 6, 1)));
        assert_eq!(days.last(), Some(&d(2025, 6, 5)));
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::new(d(2025, 6, 1), d(2025, 6, 1)).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(d(2025, 6, 5), d(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDateRange { .. }));
    }

    #[test]
    fn crosses_month_boundary() {
        let range = DateRange::new(d(2025, 1, 30), d(2025, 2, 2)).unwrap();
        assert_eq!(range.len(), 4);
    }
}
