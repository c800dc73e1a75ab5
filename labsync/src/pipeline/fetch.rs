use std::time::Duration;

use labsync_core::connector::ResultsSource;
use labsync_core::{DateInterval, LabsyncError, Stage, Tenant, TenantData};

use crate::core::call_with_timeout;

/// Run the four aggregate queries for one tenant, each under its own timeout.
///
/// The first failure cancels the remaining queries of this tenant only.
#[tracing::instrument(
    target = "labsync::fetch",
    skip_all,
    fields(tenant = %tenant.name, facilities = tenant.facility_codes.len()),
)]
pub(super) async fn fetch_tenant_data(
    source: &dyn ResultsSource,
    tenant: &Tenant,
    interval: &DateInterval,
    timeout: Duration,
) -> Result<TenantData, LabsyncError> {
    let codes = &tenant.facility_codes;
    let (summary, results, stale_pending, unsynced_facilities) = tokio::try_join!(
        call_with_timeout(
            Stage::SummaryByFacility,
            timeout,
            source.summary_by_facility(interval, codes),
        ),
        call_with_timeout(Stage::RawResults, timeout, source.raw_results(interval, codes)),
        call_with_timeout(Stage::StalePending, timeout, source.stale_pending(codes)),
        call_with_timeout(
            Stage::UnsyncedFacilities,
            timeout,
            source.unsynced_facility_summary(codes),
        ),
    )?;
    tracing::debug!(
        summary = summary.len(),
        results = results.len(),
        stale_pending = stale_pending.len(),
        unsynced = unsynced_facilities.len(),
        "tenant data fetched"
    );
    Ok(TenantData {
        summary,
        results,
        stale_pending,
        unsynced_facilities,
    })
}
