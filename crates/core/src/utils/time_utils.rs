use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

/// Converts an instant to the calendar day it falls on.
///
/// This is the single source of truth for day bucketing. Day-gating on goals
/// counts distinct values of this function, never raw timestamps.
pub fn calendar_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Counts distinct calendar days among the given instants.
pub fn count_distinct_days<I>(instants: I) -> u32
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let days: HashSet<NaiveDate> = instants.into_iter().map(calendar_day).collect();
    days.len() as u32
}

/// Whole days from `from` until `to`, negative when `to` is in the past.
pub fn days_until(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (calendar_day(to) - calendar_day(from)).num_days()
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            break;
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_count_distinct_days_buckets_by_date() {
        let instants = vec![
            Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 3, 0, 1, 0).unwrap(),
        ];
        assert_eq!(count_distinct_days(instants), 2);
    }

    #[test]
    fn test_days_until() {
        let from = Utc.with_ymd_and_hms(2026, 3, 2, 23, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 3, 5, 1, 0, 0).unwrap();
        assert_eq!(days_until(from, to), 3);
        assert_eq!(days_until(to, from), -3);
    }

    #[test]
    fn test_get_days_between() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(get_days_between(start, end).len(), 3);
        assert!(get_days_between(end, start).is_empty());
    }
}
