//! labsync
//!
//! Weekly lab-result synchronization reports for many tenants (implementing
//! partners) at once.
//!
//! Every firing resolves one reporting interval, enumerates the reportable
//! tenants and runs an independent pipeline per tenant:
//!
//! 1. fetch the four aggregate row sets (facility summary, raw results,
//!    stale pending, unsynced facilities), each call under its own timeout;
//! 2. choose the flow: no-results iff both the summary and the stale-pending
//!    rows are empty;
//! 3. hand the tenant to the configured [`channel::ReportChannel`]. The
//!    gateway channel builds the workbook, composes the HTML notification,
//!    archives the workbook to the tenant's document repository and submits
//!    the notification; the file-system channel only keeps the workbook.
//!
//! A tenant's failure is logged with tenant and stage context and recorded
//! on its [`TenantOutcome`]; it never stops the other tenants. Only a bad
//! interval configuration or a tenant-directory fault fails a firing, and
//! both happen before any tenant is touched.
//!
//! Quickstart:
//! ```rust,ignore
//! use std::sync::Arc;
//! use labsync::Labsync;
//!
//! let labsync = Labsync::builder()
//!     .with_tenant_directory(Arc::new(directory))
//!     .with_results_source(Arc::new(source))
//!     .with_gateway(Arc::new(gateway))
//!     .with_repository(Arc::new(repository))
//!     .call_timeout(std::time::Duration::from_secs(20))
//!     .build()?;
//!
//! let report = labsync.run_batch().await?;
//! for outcome in &report.outcomes {
//!     println!("{}: {:?}", outcome.tenant, outcome.status);
//! }
//! ```
//!
//! Scheduled operation:
//! ```rust,ignore
//! let scheduler = labsync::schedule::Scheduler::parse("0 0 6 * * Mon", chrono_tz::Africa::Maputo)?;
//! scheduler.run_until(&labsync, async { let _ = tokio::signal::ctrl_c().await; }).await;
//! ```
#![warn(missing_docs)]

/// Delivery channels and the archive-and-submit dispatcher.
pub mod channel;
pub(crate) mod core;
mod pipeline;
/// Cron-driven firing loop.
pub mod schedule;

pub use core::{Labsync, LabsyncBuilder};
pub use schedule::Scheduler;

// Re-export core types for convenience
pub use labsync_core::{
    BatchReport, ChannelKind, DateInterval, IntervalMode, IntervalSettings, LabsyncConfig,
    LabsyncError, ReportFlow, Stage, TemplateEngine, Tenant, TenantOutcome, TenantStatus,
};
