//! Pipeline stage labels.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Pipeline stage labels for errors, logs and outcome reports.
///
/// These map one-to-one with the external calls and pure steps of a batch,
/// and give a stable `Display` form for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Stage {
    /// Computing the reporting window.
    ResolveInterval,
    /// Listing the tenants eligible for reporting.
    EnumerateTenants,

    /// Per-facility summary aggregate.
    SummaryByFacility,
    /// One row per result record inside the interval.
    RawResults,
    /// Cumulative results pending for more than two days.
    StalePending,
    /// Per-facility stale-pending counts with last sync time.
    UnsyncedFacilities,

    /// Assembling the workbook.
    BuildReport,
    /// Rendering the HTML body.
    Render,
    /// Writing the artifact to a scoped or output location.
    WriteArtifact,
    /// Uploading the artifact to the document repository.
    Upload,
    /// Submitting the notification to the gateway.
    Submit,
}

impl Stage {
    /// Stable lowercase label used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResolveInterval => "resolve_interval",
            Self::EnumerateTenants => "enumerate_tenants",
            Self::SummaryByFacility => "summary_by_facility",
            Self::RawResults => "raw_results",
            Self::StalePending => "stale_pending",
            Self::UnsyncedFacilities => "unsynced_facilities",
            Self::BuildReport => "build_report",
            Self::Render => "render",
            Self::WriteArtifact => "write_artifact",
            Self::Upload => "upload",
            Self::Submit => "submit",
        }
    }

    /// True for the four read-only aggregate queries.
    #[must_use]
    pub const fn is_aggregation(self) -> bool {
        matches!(
            self,
            Self::SummaryByFacility | Self::RawResults | Self::StalePending | Self::UnsyncedFacilities
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
