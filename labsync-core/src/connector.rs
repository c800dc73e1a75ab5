use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;

use crate::{
    DateInterval, GatewayReceipt, LabsyncError, Notification, PendingFacilitySummaryRow,
    ResultRow, ResultSummaryRow, Tenant, UploadReceipt,
};

/// Read-only aggregation queries over the central result store.
///
/// Every method is scoped to a tenant's facility-code set. Implementations
/// must return `Ok(vec![])` for an empty code set instead of issuing a query,
/// and must never turn a query fault into an empty result.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    /// Per-facility counts for active records of the tracked result type
    /// created within `interval`, grouped by (district, facility).
    async fn summary_by_facility(
        &self,
        interval: &DateInterval,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<ResultSummaryRow>, LabsyncError>;

    /// One row per active record created within `interval`.
    async fn raw_results(
        &self,
        interval: &DateInterval,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<ResultRow>, LabsyncError>;

    /// Records still `PENDING` more than two days after creation.
    ///
    /// Cumulative: independent of the reporting interval.
    async fn stale_pending(
        &self,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<ResultRow>, LabsyncError>;

    /// Stale-pending counts per facility joined with the latest update
    /// timestamp across all active records of that facility.
    ///
    /// Cumulative: independent of the reporting interval.
    async fn unsynced_facility_summary(
        &self,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<PendingFacilitySummaryRow>, LabsyncError>;
}

/// Source of the tenants taking part in a batch.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// All enabled tenants that carry both a repository id and link.
    ///
    /// No ordering guarantee.
    async fn reportable_tenants(&self) -> Result<Vec<Tenant>, LabsyncError>;
}

/// Document repository used to archive generated workbooks.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Upload the file at `path` into the repository identified by `repo_id`.
    async fn upload(&self, repo_id: &str, path: &Path) -> Result<UploadReceipt, LabsyncError>;
}

/// Remote notification gateway.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Submit one notification. Any non-2xx response is a `Dispatch` error.
    async fn submit(&self, notification: &Notification) -> Result<GatewayReceipt, LabsyncError>;
}
