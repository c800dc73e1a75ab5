use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use labsync_core::{
    BatchReport, DateInterval, LabsyncError, ReportFlow, Stage, Tenant, TenantOutcome,
    TenantStatus, resolve,
};

use super::fetch::fetch_tenant_data;
use crate::channel::{Delivery, TenantJob};
use crate::core::{Labsync, call_with_timeout};

impl Labsync {
    /// Run one batch for "today" in the configured time zone.
    ///
    /// # Errors
    /// See [`Labsync::run_batch_on`].
    pub async fn run_batch(&self) -> Result<BatchReport, LabsyncError> {
        let today = Utc::now().with_timezone(&self.cfg.timezone).date_naive();
        self.run_batch_on(today).await
    }

    /// Run one batch as if the firing happened on `today`.
    ///
    /// The interval is resolved before the directory is consulted, so a bad
    /// custom window never touches a tenant. Every enumerated tenant is then
    /// attempted exactly once; tenant faults end up in the returned report.
    ///
    /// # Errors
    /// Returns `Configuration` if the interval cannot be resolved and
    /// `Enumeration` if the tenant directory fails or times out.
    #[tracing::instrument(target = "labsync::batch", skip(self), fields(channel = self.channel.name()))]
    pub async fn run_batch_on(&self, today: NaiveDate) -> Result<BatchReport, LabsyncError> {
        let interval = resolve(&self.cfg.interval, today).inspect_err(|e| {
            tracing::error!(stage = %e.stage(), error = %e, "interval resolution failed");
        })?;

        let tenants = call_with_timeout(
            Stage::EnumerateTenants,
            self.cfg.call_timeout,
            self.directory.reportable_tenants(),
        )
        .await
        .map_err(|e| match e {
            LabsyncError::Enumeration(_) => e,
            other => LabsyncError::Enumeration(other.to_string()),
        })
        .inspect_err(|e| tracing::error!(error = %e, "tenant enumeration failed"))?;

        tracing::info!(
            start = %interval.formatted_start(),
            end = %interval.formatted_end(),
            tenants = tenants.len(),
            "batch started"
        );

        let outcomes: Vec<TenantOutcome> = stream::iter(tenants.iter())
            .map(|tenant| self.process_tenant(tenant, &interval))
            .buffer_unordered(self.cfg.max_concurrent_tenants)
            .collect()
            .await;

        let report = BatchReport { interval, outcomes };
        tracing::info!(
            delivered = report.delivered(),
            failed = report.failed(),
            "batch finished"
        );
        Ok(report)
    }

    #[tracing::instrument(target = "labsync::tenant", skip_all, fields(tenant = %tenant.name))]
    async fn process_tenant(&self, tenant: &Tenant, interval: &DateInterval) -> TenantOutcome {
        let data = match fetch_tenant_data(
            self.source.as_ref(),
            tenant,
            interval,
            self.cfg.call_timeout,
        )
        .await
        {
            Ok(data) => data,
            Err(e) => return failed(tenant, None, e),
        };

        let flow = data.flow();
        let job = TenantJob { tenant, interval };
        let delivered = match flow {
            ReportFlow::Standard => self.channel.send_report(job, &data).await,
            ReportFlow::NoResults => self.channel.send_no_results(job).await,
        };

        match delivered {
            Ok(Delivery { warnings, saved_to }) => {
                tracing::info!(%flow, warnings = warnings.len(), "tenant delivered");
                TenantOutcome {
                    tenant: tenant.name.clone(),
                    flow: Some(flow),
                    status: TenantStatus::Delivered,
                    warnings,
                    saved_to,
                }
            }
            Err(e) => failed(tenant, Some(flow), e),
        }
    }
}

fn failed(tenant: &Tenant, flow: Option<ReportFlow>, e: LabsyncError) -> TenantOutcome {
    tracing::error!(tenant = %tenant.name, stage = %e.stage(), error = %e, "tenant failed");
    TenantOutcome {
        tenant: tenant.name.clone(),
        flow,
        status: TenantStatus::Failed(e),
        warnings: Vec::new(),
        saved_to: None,
    }
}
