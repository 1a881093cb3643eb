//! Calendar bucket arithmetic.
//!
//! The truncation function used by the aggregators and the bucket list used
//! by the merge step both come from [`Granularity`] so the two can never
//! disagree about where a bucket starts.

use crate::models::Granularity;
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};

impl Granularity {
    /// Maps a timestamp to the first date of the bucket containing it.
    pub fn truncate(self, ts: DateTime<Utc>) -> NaiveDate {
        self.floor_date(ts.date_naive())
    }

    /// Maps a date to the first date of the bucket containing it.
    pub fn floor_date(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Weekly => date - Days::new(u64::from(date.weekday().num_days_from_monday())),
            Granularity::Monthly => date - Days::new(u64::from(date.day0())),
        }
    }

    /// First date of the bucket after the one starting at `bucket`.
    ///
    /// Returns `None` only at the end of the representable calendar.
    pub fn next_bucket(self, bucket: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Daily => bucket.checked_add_days(Days::new(1)),
            Granularity::Weekly => bucket.checked_add_days(Days::new(7)),
            Granularity::Monthly => bucket.checked_add_months(Months::new(1)),
        }
    }
}

/// Generates every bucket date a timestamp in `[start, end)` could fall into.
///
/// The first bucket is `start` truncated to its calendar bucket, so for weekly
/// and monthly reports it may be labelled with a date before `start`. The
/// cursor keeps `start`'s time of day while stepping and a bucket is emitted
/// while that instant is still before `end`.
pub fn generate_periods(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
) -> Vec<NaiveDate> {
    let mut periods = Vec::new();
    if start >= end {
        return periods;
    }

    let time_of_day = start.time();
    let mut current = Some(granularity.truncate(start));

    while let Some(bucket) = current {
        if bucket.and_time(time_of_day).and_utc() >= end {
            break;
        }
        periods.push(bucket);
        current = granularity.next_bucket(bucket);
    }

    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_periods() {
        let periods = generate_periods(ts(2025, 1, 10, 12), ts(2025, 1, 13, 12), Granularity::Daily);
        assert_eq!(periods, vec![date(2025, 1, 10), date(2025, 1, 11), date(2025, 1, 12)]);
    }

    #[test]
    fn test_daily_end_at_midnight_excludes_end_date() {
        let periods = generate_periods(ts(2025, 1, 10, 0), ts(2025, 1, 12, 0), Granularity::Daily);
        assert_eq!(periods, vec![date(2025, 1, 10), date(2025, 1, 11)]);
    }

    #[test]
    fn test_daily_same_day_range_has_one_bucket() {
        let periods = generate_periods(ts(2025, 1, 10, 8), ts(2025, 1, 10, 12), Granularity::Daily);
        assert_eq!(periods, vec![date(2025, 1, 10)]);
    }

    #[test]
    fn test_empty_and_inverted_ranges() {
        let t = ts(2025, 1, 10, 12);
        for g in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            assert!(generate_periods(t, t, g).is_empty());
            assert!(generate_periods(t, ts(2025, 1, 1, 0), g).is_empty());
        }
    }

    #[test]
    fn test_weekly_rewinds_to_monday() {
        // 2025-01-10 is a Friday
        let periods = generate_periods(ts(2025, 1, 10, 12), ts(2025, 1, 31, 12), Granularity::Weekly);
        assert_eq!(
            periods,
            vec![date(2025, 1, 6), date(2025, 1, 13), date(2025, 1, 20), date(2025, 1, 27)]
        );
        assert!(periods.iter().all(|d| d.weekday() == Weekday::Mon));
    }

    #[test]
    fn test_weekly_starting_on_monday() {
        let periods = generate_periods(ts(2025, 1, 6, 0), ts(2025, 1, 20, 0), Granularity::Weekly);
        assert_eq!(periods, vec![date(2025, 1, 6), date(2025, 1, 13)]);
    }

    #[test]
    fn test_monthly_crosses_year() {
        let periods = generate_periods(ts(2024, 11, 15, 0), ts(2025, 2, 10, 0), Granularity::Monthly);
        assert_eq!(
            periods,
            vec![date(2024, 11, 1), date(2024, 12, 1), date(2025, 1, 1), date(2025, 2, 1)]
        );
    }

    #[test]
    fn test_monthly_excludes_month_when_end_is_first() {
        let periods = generate_periods(ts(2025, 1, 15, 0), ts(2025, 3, 1, 0), Granularity::Monthly);
        assert_eq!(periods, vec![date(2025, 1, 1), date(2025, 2, 1)]);
    }

    #[test]
    fn test_monthly_handles_short_months() {
        let periods = generate_periods(ts(2024, 1, 31, 0), ts(2024, 4, 30, 0), Granularity::Monthly);
        assert_eq!(
            periods,
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]
        );
    }

    #[test]
    fn test_truncate_matches_generated_buckets() {
        // Every fixture timestamp must truncate onto a bucket the generator emits.
        let start = ts(2024, 12, 18, 9);
        let end = ts(2025, 3, 4, 9);
        let fixtures = [
            ts(2024, 12, 18, 9),
            ts(2024, 12, 31, 23),
            ts(2025, 1, 1, 0),
            ts(2025, 2, 28, 17),
            ts(2025, 3, 3, 8),
        ];

        for g in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            let periods = generate_periods(start, end, g);
            for fixture in fixtures {
                let bucket = g.truncate(fixture);
                assert!(periods.contains(&bucket), "{g}: {fixture} -> {bucket} not in {periods:?}");
            }
        }
    }

    #[test]
    fn test_weekly_truncates_to_own_monday() {
        assert_eq!(Granularity::Weekly.truncate(ts(2025, 1, 12, 23)), date(2025, 1, 6));
        assert_eq!(Granularity::Weekly.truncate(ts(2025, 1, 13, 0)), date(2025, 1, 13));
        assert_eq!(Granularity::Monthly.truncate(ts(2025, 2, 28, 12)), date(2025, 2, 1));
    }
}
