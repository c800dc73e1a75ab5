use chrono::NaiveDate;
use labsync_core::{IntervalMode, IntervalSettings, LabsyncError, resolve};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

fn custom(start: Option<&str>, end: Option<&str>) -> IntervalSettings {
    IntervalSettings {
        report_date_interval: IntervalMode::Custom,
        start_date: start.map(str::to_string),
        end_date: end.map(str::to_string),
    }
}

#[test]
fn custom_bounds_span_whole_days() {
    let iv = resolve(&custom(Some("2024-03-01"), Some("2024-03-10")), today()).unwrap();
    assert_eq!(iv.start().to_string(), "2024-03-01 00:00:00");
    assert_eq!(iv.end().to_string(), "2024-03-10 23:59:59");
}

#[test]
fn custom_with_malformed_date_is_a_configuration_error() {
    let err = resolve(&custom(Some("2024-13-01"), Some("2024-03-10")), today()).unwrap_err();
    assert!(matches!(err, LabsyncError::Configuration(_)), "got {err:?}");
    assert!(err.is_fatal_to_batch());
}

#[test]
fn custom_with_missing_end_is_a_configuration_error() {
    let err = resolve(&custom(Some("2024-03-01"), None), today()).unwrap_err();
    assert!(matches!(err, LabsyncError::Configuration(ref m) if m.contains("end_date")));
}

#[test]
fn custom_with_blank_start_is_a_configuration_error() {
    let err = resolve(&custom(Some("   "), Some("2024-03-10")), today()).unwrap_err();
    assert!(matches!(err, LabsyncError::Configuration(ref m) if m.contains("start_date")));
}

#[test]
fn custom_with_inverted_bounds_is_rejected() {
    let err = resolve(&custom(Some("2024-03-10"), Some("2024-03-01")), today()).unwrap_err();
    assert!(matches!(err, LabsyncError::Configuration(_)));
}

#[test]
fn single_day_custom_window_is_allowed() {
    let iv = resolve(&custom(Some("2024-03-05"), Some("2024-03-05")), today()).unwrap();
    assert_eq!(iv.formatted_start(), iv.formatted_end());
}

#[test]
fn default_mode_ignores_stale_custom_dates() {
    let settings = IntervalSettings {
        report_date_interval: IntervalMode::Default,
        start_date: Some("garbage".into()),
        end_date: None,
    };
    // Wednesday 2024-03-20 -> Sunday 10th .. Saturday 16th
    let iv = resolve(&settings, today()).unwrap();
    assert_eq!(iv.formatted_start(), "10-03-2024");
    assert_eq!(iv.formatted_end(), "16-03-2024");
}
