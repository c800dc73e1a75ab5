//! Delivery channels: what happens to a tenant's data once the flow is known.

use std::path::PathBuf;

use async_trait::async_trait;
use labsync_core::{DateInterval, LabsyncError, Tenant, TenantData};

pub mod dispatch;
mod filesystem;
mod gateway;

pub use filesystem::FileSystemChannel;
pub use gateway::GatewayChannel;

/// One tenant in one firing.
#[derive(Debug, Clone, Copy)]
pub struct TenantJob<'a> {
    /// Tenant being reported on.
    pub tenant: &'a Tenant,
    /// Interval shared by the whole batch.
    pub interval: &'a DateInterval,
}

/// What a channel achieved for a tenant.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Non-fatal issues, e.g. a failed archive upload.
    pub warnings: Vec<LabsyncError>,
    /// Where the workbook was left on disk, for channels that keep it.
    pub saved_to: Option<PathBuf>,
}

/// Delivers one tenant's report or no-results notice.
///
/// Implementations must be safe to call for several tenants at once and
/// must not keep per-tenant state between calls.
#[async_trait]
pub trait ReportChannel: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Standard flow: the tenant has summary or stale-pending rows.
    async fn send_report(
        &self,
        job: TenantJob<'_>,
        data: &TenantData,
    ) -> Result<Delivery, LabsyncError>;

    /// No-results flow.
    async fn send_no_results(&self, job: TenantJob<'_>) -> Result<Delivery, LabsyncError>;
}
