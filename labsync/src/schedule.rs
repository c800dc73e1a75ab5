//! Cron-driven firing loop.

use core::future::Future;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use labsync_core::LabsyncError;

use crate::core::Labsync;

/// A parsed cron expression evaluated in a fixed time zone.
///
/// Expressions use six fields, seconds first: `0 0 6 * * MON` fires every
/// Monday at 06:00.
#[derive(Debug, Clone)]
pub struct Scheduler {
    schedule: Schedule,
    tz: Tz,
}

impl Scheduler {
    /// Parse `expr`.
    ///
    /// # Errors
    /// Returns `Configuration` if the expression is not valid.
    pub fn parse(expr: &str, tz: Tz) -> Result<Self, LabsyncError> {
        let schedule = Schedule::from_str(expr.trim()).map_err(|e| {
            LabsyncError::configuration(format!("invalid cron expression '{expr}': {e}"))
        })?;
        Ok(Self { schedule, tz })
    }

    /// Next firing strictly after `after`.
    #[must_use]
    pub fn next_after(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.schedule.after(after).next()
    }

    /// Fire `labsync` on every tick until `shutdown` resolves.
    ///
    /// Shutdown is only observed while waiting; a batch in progress runs to
    /// completion. A firing that fails before touching tenants is logged and
    /// the loop waits for the next tick. Returns the number of firings.
    pub async fn run_until<S>(&self, labsync: &Labsync, shutdown: S) -> usize
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut fired = 0;
        loop {
            let now = Utc::now().with_timezone(&self.tz);
            let Some(next) = self.next_after(&now) else {
                tracing::warn!("schedule has no upcoming firings; stopping");
                return fired;
            };
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::info!(next = %next, "waiting for next firing");

            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!(fired, "shutdown requested; scheduler stopped");
                    return fired;
                }
                () = tokio::time::sleep(wait) => {}
            }

            fired += 1;
            match labsync.run_batch_on(next.date_naive()).await {
                Ok(report) => tracing::info!(
                    delivered = report.delivered(),
                    failed = report.failed(),
                    "firing complete"
                ),
                Err(e) => tracing::error!(stage = %e.stage(), error = %e, "firing failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike, Weekday};

    #[test]
    fn weekly_expression_fires_on_monday_morning() {
        let s = Scheduler::parse("0 0 6 * * Mon", chrono_tz::Africa::Maputo).unwrap();
        // Wednesday 2024-03-13 12:00 local
        let now = chrono_tz::Africa::Maputo
            .with_ymd_and_hms(2024, 3, 13, 12, 0, 0)
            .unwrap();
        let next = s.next_after(&now).unwrap();
        assert_eq!(next.weekday(), Weekday::Mon);
        assert_eq!(next.date_naive().day(), 18);
        assert_eq!((next.hour(), next.minute(), next.second()), (6, 0, 0));
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        for bad in ["", "not a cron", "0 6 * * * * * *"] {
            let err = Scheduler::parse(bad, chrono_tz::UTC).unwrap_err();
            assert!(matches!(err, LabsyncError::Configuration(_)), "{bad}");
        }
    }
}
