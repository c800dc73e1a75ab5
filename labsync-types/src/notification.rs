//! Notification envelopes passed between the composer, dispatcher and gateway.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::reports::ReportFlow;

/// In-memory workbook plus the file name it will travel under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name, e.g. `CSaude_Resultados_SI-SESP_ABC_01-01-2023_a_07-01-2023.xlsx`.
    pub name: String,
    /// Workbook bytes.
    pub bytes: Vec<u8>,
}

/// Output of the notification composer for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedNotification {
    /// Flow this notification belongs to.
    pub flow: ReportFlow,
    /// Localized subject line.
    pub subject: String,
    /// Rendered HTML body.
    pub html_body: String,
    /// Attachment file name; present only in the standard flow.
    pub attachment_name: Option<String>,
}

/// Reference to an artifact that exists on disk for the duration of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// File name announced to the gateway.
    pub name: String,
    /// Location of the bytes.
    pub path: PathBuf,
}

/// Everything the gateway needs to deliver one tenant's notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient addresses.
    pub recipients: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
    /// Module tag understood by the gateway.
    pub module: String,
    /// Attachment, when the standard flow produced one.
    pub attachment: Option<ArtifactRef>,
    /// Interval start as `dd-MM-yyyy`.
    pub start_date: String,
    /// Interval end as `dd-MM-yyyy`.
    pub end_date: String,
    /// Tenant repository link.
    pub repo_link: String,
    /// `true` for the standard flow, `false` for no-results.
    pub has_results: bool,
}

/// Gateway acknowledgement of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayReceipt {
    /// HTTP status (always 2xx).
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

/// Opaque confirmation returned by the document repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt(pub String);
