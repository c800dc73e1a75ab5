//! Reporting-window resolution.
//!
//! The default window is the previous calendar week, Sunday 00:00:00
//! through Saturday 23:59:59, relative to "today" in the reporting time
//! zone. A custom window is read from two `yyyy-MM-dd` settings.

use chrono::{Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{DateInterval, IntervalMode, IntervalSettings, LabsyncError};

const SETTINGS_DATE_FORMAT: &str = "%Y-%m-%d";

/// The Sunday-to-Saturday week that ended before the week containing `today`.
///
/// When `today` is a Sunday the result ends yesterday.
///
/// # Errors
/// Only fails if the calendar arithmetic leaves chrono's supported range.
pub fn previous_week(today: NaiveDate) -> Result<DateInterval, LabsyncError> {
    let since_sunday = u64::from(today.weekday().num_days_from_sunday());
    let this_sunday = today - Days::new(since_sunday);
    let start = this_sunday - Days::new(7);
    let end = this_sunday - Days::new(1);
    DateInterval::from_days(start, end)
}

/// Resolve the reporting window for a firing that happens on `today`.
///
/// # Errors
/// Returns `Configuration` when the custom mode is selected and either
/// bound is missing, unparsable, or the start falls after the end.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        target = "labsync::interval",
        skip(settings),
        fields(mode = ?settings.report_date_interval),
    )
)]
pub fn resolve(settings: &IntervalSettings, today: NaiveDate) -> Result<DateInterval, LabsyncError> {
    match settings.report_date_interval {
        IntervalMode::Default => previous_week(today),
        IntervalMode::Custom => {
            let first = parse_setting("start_date", settings.start_date.as_deref())?;
            let last = parse_setting("end_date", settings.end_date.as_deref())?;
            DateInterval::from_days(first, last)
        }
    }
}

/// Resolve the reporting window using the current date in `tz`.
///
/// # Errors
/// See [`resolve`].
pub fn resolve_now(settings: &IntervalSettings, tz: Tz) -> Result<DateInterval, LabsyncError> {
    resolve(settings, Utc::now().with_timezone(&tz).date_naive())
}

fn parse_setting(key: &str, raw: Option<&str>) -> Result<NaiveDate, LabsyncError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            LabsyncError::configuration(format!("custom interval requires `{key}` (yyyy-MM-dd)"))
        })?;
    NaiveDate::parse_from_str(raw, SETTINGS_DATE_FORMAT).map_err(|e| {
        LabsyncError::configuration(format!("`{key}` = {raw:?} is not a yyyy-MM-dd date: {e}"))
    })
}
