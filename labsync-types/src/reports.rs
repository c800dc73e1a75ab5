//! Outcome envelopes produced by a batch run.

use core::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::LabsyncError;
use crate::interval::DateInterval;

/// Which of the two mutually exclusive notification flows was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportFlow {
    /// Workbook attached, summary template.
    Standard,
    /// No attachment, no-results template.
    NoResults,
}

impl ReportFlow {
    /// The has-results flag sent to the gateway.
    #[must_use]
    pub const fn has_results(self) -> bool {
        matches!(self, Self::Standard)
    }
}

impl fmt::Display for ReportFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::NoResults => "no_results",
        })
    }
}

/// Terminal state of one tenant's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantStatus {
    /// Every mandatory stage succeeded.
    Delivered,
    /// A stage failed; later stages were not attempted.
    Failed(LabsyncError),
}

/// Result of processing a single tenant.
///
/// Carries the flow (when the pipeline got far enough to choose one), the
/// terminal status and any non-fatal issues such as a failed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantOutcome {
    /// Tenant name.
    pub tenant: String,
    /// Selected flow, if aggregation succeeded.
    pub flow: Option<ReportFlow>,
    /// Terminal status.
    pub status: TenantStatus,
    /// Non-fatal issues encountered along the way.
    pub warnings: Vec<LabsyncError>,
    /// Where the workbook was kept, for channels that write it locally.
    pub saved_to: Option<PathBuf>,
}

impl TenantOutcome {
    /// True when the tenant's notification went out.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self.status, TenantStatus::Delivered)
    }

    /// The failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&LabsyncError> {
        match &self.status {
            TenantStatus::Failed(e) => Some(e),
            TenantStatus::Delivered => None,
        }
    }
}

/// Summary of one scheduled firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Interval every tenant was reported on.
    pub interval: DateInterval,
    /// One outcome per enumerated tenant, in completion order.
    pub outcomes: Vec<TenantOutcome>,
}

impl BatchReport {
    /// Number of tenants whose notification went out.
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    /// Number of tenants that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }

    /// Look up the outcome for a tenant by name.
    #[must_use]
    pub fn outcome(&self, tenant: &str) -> Option<&TenantOutcome> {
        self.outcomes.iter().find(|o| o.tenant == tenant)
    }
}
