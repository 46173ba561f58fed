//! Pure aggregation over a record snapshot. Nothing here touches storage;
//! callers pass the list they got from the store and a reference date so
//! the math stays deterministic and testable.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::record::round_to_tenth;
use crate::models::WorkRecord;

/// Sum `hours` over records whose start date falls within `[from, to]`,
/// bounds inclusive.
pub fn sum_hours(records: &[WorkRecord], from: NaiveDate, to: NaiveDate) -> f64 {
    records
        .iter()
        .filter(|record| record.start_date >= from && record.start_date <= to)
        .map(|record| record.hours)
        .sum()
}

/// Hours logged in the Monday-start week containing `today`.
pub fn weekly_hours(records: &[WorkRecord], today: NaiveDate) -> f64 {
    let week = today.week(Weekday::Mon);
    sum_hours(records, week.first_day(), week.last_day())
}

/// Hours logged in the calendar month containing `today`.
pub fn monthly_hours(records: &[WorkRecord], today: NaiveDate) -> f64 {
    let (first, last) = month_bounds(today);
    sum_hours(records, first, last)
}

/// Hours logged over the whole history.
pub fn total_hours(records: &[WorkRecord]) -> f64 {
    records.iter().map(|record| record.hours).sum()
}

/// Display transform for the stats cards: hours expressed in working days
/// of `hours_per_day` hours each, rounded to one decimal.
pub fn hours_to_days(hours: f64, hours_per_day: f64) -> f64 {
    if hours_per_day <= 0.0 {
        return 0.0;
    }
    round_to_tenth(hours / hours_per_day)
}

/// Per-day totals for the trailing `days` days ending at `today`, oldest
/// first. Feeds the recent-activity chart.
pub fn daily_hours(records: &[WorkRecord], today: NaiveDate, days: u32) -> Vec<(NaiveDate, f64)> {
    (0..days)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(i64::from(offset));
            (day, sum_hours(records, day, day))
        })
        .collect()
}

fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let next_month = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    };
    let last = next_month
        .map(|date| date - Duration::days(1))
        .unwrap_or(today);
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    use crate::models::NewWorkRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(start: NaiveDate, hours_span: (u32, u32)) -> WorkRecord {
        let (from, to) = hours_span;
        NewWorkRecord::new(
            start,
            NaiveTime::from_hms_opt(from, 0, 0).unwrap(),
            start,
            NaiveTime::from_hms_opt(to, 0, 0).unwrap(),
            "work",
        )
        .unwrap()
        .with_id(format!("{start}"))
    }

    #[test]
    fn sum_is_inclusive_on_both_bounds() {
        let records = vec![
            record(date(2025, 4, 14), (9, 17)),
            record(date(2025, 4, 18), (9, 18)),
            record(date(2025, 4, 21), (9, 12)),
        ];

        // 2025-04-14 (Mon) and 2025-04-18 (Fri) sit exactly on and inside
        // the window; 2025-04-21 is the Monday after.
        let sum = sum_hours(&records, date(2025, 4, 14), date(2025, 4, 20));
        assert_eq!(sum, 8.0 + 9.0);
    }

    #[test]
    fn records_outside_window_do_not_contribute() {
        let records = vec![record(date(2025, 3, 31), (9, 17))];
        assert_eq!(sum_hours(&records, date(2025, 4, 1), date(2025, 4, 30)), 0.0);
    }

    #[test]
    fn weekly_window_starts_on_monday() {
        let records = vec![
            // Sunday before the target week.
            record(date(2025, 4, 13), (9, 17)),
            // Monday and Friday of the target week.
            record(date(2025, 4, 14), (9, 17)),
            record(date(2025, 4, 18), (9, 18)),
        ];

        // Friday 2025-04-18 falls in the Mon 14th .. Sun 20th week.
        assert_eq!(weekly_hours(&records, date(2025, 4, 18)), 8.0 + 9.0);
    }

    #[test]
    fn weekly_scenario_two_records_same_week() {
        let records = vec![
            record(date(2025, 4, 18), (9, 18)),
            record(date(2025, 4, 17), (10, 19)),
        ];
        assert_eq!(weekly_hours(&records, date(2025, 4, 18)), 9.0 + 9.0);
    }

    #[test]
    fn monthly_window_covers_whole_calendar_month() {
        let records = vec![
            record(date(2025, 4, 1), (9, 17)),
            record(date(2025, 4, 30), (9, 17)),
            record(date(2025, 5, 1), (9, 17)),
            record(date(2025, 3, 31), (9, 17)),
        ];
        assert_eq!(monthly_hours(&records, date(2025, 4, 15)), 16.0);
    }

    #[test]
    fn december_month_bounds_roll_into_next_year() {
        let records = vec![
            record(date(2025, 12, 31), (9, 17)),
            record(date(2026, 1, 1), (9, 17)),
        ];
        assert_eq!(monthly_hours(&records, date(2025, 12, 10)), 8.0);
    }

    #[test]
    fn total_ignores_dates_entirely() {
        let records = vec![
            record(date(2020, 1, 1), (9, 17)),
            record(date(2025, 4, 18), (9, 18)),
        ];
        assert_eq!(total_hours(&records), 17.0);
    }

    #[test]
    fn converts_hours_to_days_at_one_decimal() {
        assert_eq!(hours_to_days(9.0, 7.0), 1.3);
        assert_eq!(hours_to_days(14.0, 7.0), 2.0);
        assert_eq!(hours_to_days(0.0, 7.0), 0.0);
    }

    #[test]
    fn hours_to_days_guards_against_zero_divisor() {
        assert_eq!(hours_to_days(9.0, 0.0), 0.0);
    }

    #[test]
    fn daily_series_is_oldest_first_and_zero_filled() {
        let records = vec![
            record(date(2025, 4, 18), (9, 18)),
            record(date(2025, 4, 16), (14, 22)),
        ];

        let series = daily_hours(&records, date(2025, 4, 18), 3);
        assert_eq!(
            series,
            vec![
                (date(2025, 4, 16), 8.0),
                (date(2025, 4, 17), 0.0),
                (date(2025, 4, 18), 9.0),
            ]
        );
    }
}
