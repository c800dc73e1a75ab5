//! Test doubles for the labsync collaborators.
//!
//! - [`MockResultsSource`] / [`MockTenantDirectory`] serve deterministic
//!   fixture data. Facility code `FAIL` forces an aggregation fault and
//!   `TIMEOUT` delays every query long enough to trip a short call timeout.
//! - [`dynamic`] holds scriptable gateway, repository and directory doubles
//!   driven by a [`DynamicMockController`].

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use labsync_core::connector::{ResultsSource, TenantDirectory};
use labsync_core::{
    CauseCounts, DateInterval, LabsyncError, PendingFacilitySummaryRow, ResultRow, ResultStatus,
    ResultSummaryRow, Stage, Tenant, TenantRecord,
};

pub mod dynamic;
mod fixtures;

pub use dynamic::{
    DynamicMock, DynamicMockController, MockBehavior, SubmissionRecord, UploadRecord,
};

/// How long a `TIMEOUT` facility stalls each query.
pub const TIMEOUT_DELAY: Duration = Duration::from_millis(200);

/// Fixture-backed [`ResultsSource`].
///
/// Summaries are derived from the fixture records on every call so the
/// four row sets always agree with each other.
#[derive(Debug, Clone, Default)]
pub struct MockResultsSource {
    extra: BTreeMap<String, Vec<ResultRow>>,
}

impl MockResultsSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records for a facility on top of the built-in fixtures.
    #[must_use]
    pub fn with_records(mut self, code: impl Into<String>, rows: Vec<ResultRow>) -> Self {
        self.extra.entry(code.into()).or_default().extend(rows);
        self
    }

    async fn maybe_fail_or_timeout(code: &str, stage: Stage) -> Result<(), LabsyncError> {
        match code {
            "FAIL" => Err(LabsyncError::aggregation(
                stage,
                format!("forced failure for facility {code}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(TIMEOUT_DELAY).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn records(
        &self,
        codes: &BTreeSet<String>,
        stage: Stage,
    ) -> Result<Vec<ResultRow>, LabsyncError> {
        let mut out = Vec::new();
        for code in codes {
            Self::maybe_fail_or_timeout(code, stage).await?;
            out.extend(fixtures::results::by_facility(code));
            if let Some(extra) = self.extra.get(code) {
                out.extend(extra.iter().cloned());
            }
        }
        Ok(out)
    }

    fn within(interval: &DateInterval, row: &ResultRow) -> bool {
        row.created_at >= interval.start() && row.created_at <= interval.end()
    }

    fn is_stale_pending(row: &ResultRow, now: NaiveDateTime) -> bool {
        row.status == ResultStatus::Pending && (now - row.created_at).num_days() > 2
    }
}

#[async_trait]
impl ResultsSource for MockResultsSource {
    async fn summary_by_facility(
        &self,
        interval: &DateInterval,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<ResultSummaryRow>, LabsyncError> {
        let rows = self.records(codes, Stage::SummaryByFacility).await?;
        let mut grouped: BTreeMap<(String, String), ResultSummaryRow> = BTreeMap::new();
        for r in rows.iter().filter(|r| Self::within(interval, r)) {
            let entry = grouped
                .entry((r.district.clone(), r.facility_code.clone()))
                .or_insert_with(|| ResultSummaryRow {
                    district: r.district.clone(),
                    facility_code: r.facility_code.clone(),
                    facility_name: r.facility_name.clone(),
                    received: 0,
                    processed: 0,
                    pending: 0,
                    not_processed: CauseCounts::default(),
                });
            entry.received += 1;
            match (r.status, r.effective_cause()) {
                (ResultStatus::Processed, _) => entry.processed += 1,
                (ResultStatus::Pending, _) => entry.pending += 1,
                (ResultStatus::NotProcessed, Some(cause)) => entry.not_processed.add(cause, 1),
                (ResultStatus::NotProcessed, None) => {}
            }
        }
        Ok(grouped.into_values().collect())
    }

    async fn raw_results(
        &self,
        interval: &DateInterval,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<ResultRow>, LabsyncError> {
        let rows = self.records(codes, Stage::RawResults).await?;
        Ok(rows
            .into_iter()
            .filter(|r| Self::within(interval, r))
            .collect())
    }

    async fn stale_pending(
        &self,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<ResultRow>, LabsyncError> {
        let now = Utc::now().naive_utc();
        let rows = self.records(codes, Stage::StalePending).await?;
        Ok(rows
            .into_iter()
            .filter(|r| Self::is_stale_pending(r, now))
            .collect())
    }

    async fn unsynced_facility_summary(
        &self,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<PendingFacilitySummaryRow>, LabsyncError> {
        let now = Utc::now().naive_utc();
        let rows = self.records(codes, Stage::UnsyncedFacilities).await?;
        let mut out = Vec::new();
        for code in codes {
            let facility: Vec<&ResultRow> =
                rows.iter().filter(|r| &r.facility_code == code).collect();
            let stale = facility
                .iter()
                .filter(|r| Self::is_stale_pending(r, now))
                .count();
            let stale = u64::try_from(stale).unwrap_or(u64::MAX);
            let Some(first) = facility.first() else {
                continue;
            };
            if stale == 0 {
                continue;
            }
            out.push(PendingFacilitySummaryRow {
                district: first.district.clone(),
                facility_code: code.clone(),
                facility_name: first.facility_name.clone(),
                pending: stale,
                last_sync: facility.iter().filter_map(|r| r.updated_at).max(),
            });
        }
        Ok(out)
    }
}

/// Fixture-backed [`TenantDirectory`].
///
/// Applies the same eligibility filter as a real directory: enabled and
/// carrying both repository fields.
#[derive(Debug, Clone)]
pub struct MockTenantDirectory {
    records: Vec<TenantRecord>,
}

impl Default for MockTenantDirectory {
    fn default() -> Self {
        Self::fixture()
    }
}

impl MockTenantDirectory {
    /// The built-in fixture tenants.
    #[must_use]
    pub fn fixture() -> Self {
        Self {
            records: fixtures::tenants::all(),
        }
    }

    /// A directory over arbitrary records.
    #[must_use]
    pub const fn with_records(records: Vec<TenantRecord>) -> Self {
        Self { records }
    }

    /// Only the fixture tenants with the given names, in the given order.
    #[must_use]
    pub fn only(names: &[&str]) -> Self {
        let all = fixtures::tenants::all();
        Self {
            records: names
                .iter()
                .filter_map(|n| all.iter().find(|r| r.name == *n).cloned())
                .collect(),
        }
    }
}

#[async_trait]
impl TenantDirectory for MockTenantDirectory {
    async fn reportable_tenants(&self) -> Result<Vec<Tenant>, LabsyncError> {
        Ok(self
            .records
            .iter()
            .cloned()
            .filter_map(TenantRecord::into_reportable)
            .collect())
    }
}
