//! labsync-sql
//!
//! MySQL-backed [`ResultsSource`] and [`TenantDirectory`] built on `sqlx`.
//!
//! The aggregate queries run against the `VlData` table; tenants come from
//! `ImplementingPartner` with their facility codes in `OrgUnit`.
#![warn(missing_docs)]

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use labsync_core::connector::{ResultsSource, TenantDirectory};
use labsync_core::{
    DateInterval, LabsyncError, PendingFacilitySummaryRow, ResultRow, ResultSummaryRow, Stage,
    Tenant, TenantRecord,
};
use sqlx::MySqlPool;

pub mod queries;
mod records;

use records::{DetailRecord, OrgUnitRecord, PartnerRecord, SummaryRecord, UnsyncedRecord};

/// Aggregation client and tenant directory over one MySQL pool.
#[derive(Debug, Clone)]
pub struct SqlConnector {
    pool: MySqlPool,
}

impl SqlConnector {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    fn query_err(stage: Stage) -> impl FnOnce(sqlx::Error) -> LabsyncError {
        move |e| LabsyncError::aggregation(stage, e.to_string())
    }

    async fn details(
        &self,
        stage: Stage,
        mut qb: sqlx::QueryBuilder<'_, sqlx::MySql>,
    ) -> Result<Vec<ResultRow>, LabsyncError> {
        qb.build_query_as::<DetailRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(Self::query_err(stage))?
            .into_iter()
            .map(|r| r.into_row(stage))
            .collect()
    }
}

#[async_trait]
impl ResultsSource for SqlConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "labsync::sql",
            skip(self, codes),
            fields(facilities = codes.len()),
        )
    )]
    async fn summary_by_facility(
        &self,
        interval: &DateInterval,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<ResultSummaryRow>, LabsyncError> {
        if codes.is_empty() {
            return Ok(vec![]);
        }
        let mut qb = queries::summary_by_facility(interval, codes);
        let rows = qb
            .build_query_as::<SummaryRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(Self::query_err(Stage::SummaryByFacility))?;
        Ok(rows.into_iter().map(ResultSummaryRow::from).collect())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "labsync::sql",
            skip(self, codes),
            fields(facilities = codes.len()),
        )
    )]
    async fn raw_results(
        &self,
        interval: &DateInterval,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<ResultRow>, LabsyncError> {
        if codes.is_empty() {
            return Ok(vec![]);
        }
        self.details(Stage::RawResults, queries::raw_results(interval, codes))
            .await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "labsync::sql",
            skip(self, codes),
            fields(facilities = codes.len()),
        )
    )]
    async fn stale_pending(
        &self,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<ResultRow>, LabsyncError> {
        if codes.is_empty() {
            return Ok(vec![]);
        }
        self.details(Stage::StalePending, queries::stale_pending(codes))
            .await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "labsync::sql",
            skip(self, codes),
            fields(facilities = codes.len()),
        )
    )]
    async fn unsynced_facility_summary(
        &self,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<PendingFacilitySummaryRow>, LabsyncError> {
        if codes.is_empty() {
            return Ok(vec![]);
        }
        let mut qb = queries::unsynced_facility_summary(codes);
        let rows = qb
            .build_query_as::<UnsyncedRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(Self::query_err(Stage::UnsyncedFacilities))?;
        Ok(rows.into_iter().map(PendingFacilitySummaryRow::from).collect())
    }
}

#[async_trait]
impl TenantDirectory for SqlConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "labsync::sql", skip(self))
    )]
    async fn reportable_tenants(&self) -> Result<Vec<Tenant>, LabsyncError> {
        let enumeration = |e: sqlx::Error| LabsyncError::Enumeration(e.to_string());
        let partners: Vec<PartnerRecord> = sqlx::query_as(queries::REPORTABLE_PARTNERS)
            .fetch_all(&self.pool)
            .await
            .map_err(enumeration)?;
        if partners.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<i64> = partners.iter().map(|p| p.id).collect();
        let mut qb = queries::org_units(&ids);
        let units: Vec<OrgUnitRecord> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(enumeration)?;
        let mut codes: HashMap<i64, Vec<String>> = HashMap::new();
        for unit in units {
            codes
                .entry(unit.implementing_partner_id)
                .or_default()
                .push(unit.code);
        }
        Ok(partners
            .into_iter()
            .filter_map(|p| {
                TenantRecord {
                    facility_codes: codes.remove(&p.id).unwrap_or_default(),
                    name: p.org_name,
                    mail_list: p.mail_list,
                    repo_id: p.repo_id,
                    repo_link: p.repo_link,
                    enabled: p.enabled != 0,
                }
                .into_reportable()
            })
            .collect())
    }
}
