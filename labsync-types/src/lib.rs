//! Labsync-specific data transfer objects and configuration primitives.
//!
//! Everything here is plain data: tenants, the reporting interval, the four
//! aggregate row sets, notification envelopes, per-run outcome reports and
//! the workspace-wide [`LabsyncError`].
#![warn(missing_docs)]

mod config;
mod error;
mod interval;
mod notification;
mod reports;
mod rows;
mod stage;
mod tenant;

pub use config::{ChannelKind, IntervalMode, IntervalSettings, LabsyncConfig};
pub use error::LabsyncError;
pub use interval::{DISPLAY_DATE_FORMAT, DISPLAY_DATETIME_FORMAT, DateInterval};
pub use notification::{
    ArtifactRef, Attachment, ComposedNotification, GatewayReceipt, Notification, UploadReceipt,
};
pub use reports::{BatchReport, ReportFlow, TenantOutcome, TenantStatus};
pub use rows::{
    CauseCounts, NotProcessedCause, PendingFacilitySummaryRow, ResultRow, ResultStatus,
    ResultSummaryRow, TenantData,
};
pub use stage::Stage;
pub use tenant::{Tenant, TenantRecord};
