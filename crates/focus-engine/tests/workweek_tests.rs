//! Tests for work-week window generation.

use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use focus_engine::error::FocusError;
use focus_engine::workweek::{current_work_week, work_windows};
use focus_engine::AnalysisConfig;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn five_windows_monday_to_friday() {
    // 2026-03-18 is a Wednesday.
    let windows = work_windows(&AnalysisConfig::default(), date(2026, 3, 18)).unwrap();

    assert_eq!(windows.len(), 5);
    assert_eq!(windows[0].date, date(2026, 3, 16));
    assert_eq!(windows[4].date, date(2026, 3, 20));
    let weekdays: Vec<Weekday> = windows.iter().map(|w| w.date.weekday()).collect();
    assert_eq!(
        weekdays,
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri
        ]
    );
}

#[test]
fn default_window_is_0930_to_1800_utc() {
    let windows = work_windows(&AnalysisConfig::default(), date(2026, 3, 16)).unwrap();

    let monday = windows[0];
    assert_eq!(
        monday.start(),
        Utc.with_ymd_and_hms(2026, 3, 16, 9, 30, 0).unwrap().timestamp()
    );
    assert_eq!(
        monday.end(),
        Utc.with_ymd_and_hms(2026, 3, 16, 18, 0, 0).unwrap().timestamp()
    );
    assert_eq!(monday.interval.duration_seconds(), 510 * 60);
}

#[test]
fn sunday_reference_belongs_to_the_preceding_week() {
    // 2026-03-22 is a Sunday; its ISO week started on Monday 2026-03-16.
    let windows = work_windows(&AnalysisConfig::default(), date(2026, 3, 22)).unwrap();

    assert_eq!(windows[0].date, date(2026, 3, 16));
}

#[test]
fn clock_times_are_read_in_configured_zone() {
    let config = AnalysisConfig {
        timezone: "America/New_York".to_string(),
        day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        ..AnalysisConfig::default()
    };

    let windows = work_windows(&config, date(2026, 3, 16)).unwrap();

    let tz: Tz = "America/New_York".parse().unwrap();
    let expected = tz
        .with_ymd_and_hms(2026, 3, 16, 9, 0, 0)
        .unwrap()
        .timestamp();
    assert_eq!(windows[0].start(), expected);
    // New York is UTC-4 in mid-March (DST started 2026-03-08).
    assert_eq!(
        windows[0].start(),
        Utc.with_ymd_and_hms(2026, 3, 16, 13, 0, 0).unwrap().timestamp()
    );
}

#[test]
fn unknown_timezone_is_an_error() {
    let config = AnalysisConfig {
        timezone: "Mars/Olympus_Mons".to_string(),
        ..AnalysisConfig::default()
    };

    let err = work_windows(&config, date(2026, 3, 16)).unwrap_err();

    assert!(matches!(err, FocusError::InvalidTimezone(_)), "got {err:?}");
}

#[test]
fn current_week_starts_on_a_monday() {
    let windows = current_work_week(&AnalysisConfig::default()).unwrap();

    assert_eq!(windows.len(), 5);
    assert_eq!(windows[0].date.weekday(), Weekday::Mon);
    assert!(windows.windows(2).all(|w| w[0].end() < w[1].start()));
}
