//! Re-export of the shared DTOs from `labsync-types`.
// Downstream crates can depend on `labsync-core` only

pub use labsync_types::{ChannelKind, IntervalMode, IntervalSettings, LabsyncConfig, LabsyncError};

pub use labsync_types::{DISPLAY_DATE_FORMAT, DISPLAY_DATETIME_FORMAT, DateInterval};

pub use labsync_types::{
    ArtifactRef, Attachment, ComposedNotification, GatewayReceipt, Notification, UploadReceipt,
};

pub use labsync_types::{BatchReport, ReportFlow, TenantOutcome, TenantStatus};

pub use labsync_types::{
    CauseCounts, NotProcessedCause, PendingFacilitySummaryRow, ResultRow, ResultStatus,
    ResultSummaryRow, TenantData,
};

pub use labsync_types::{Stage, Tenant, TenantRecord};
