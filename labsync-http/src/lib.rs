//! labsync-http
//!
//! HTTP adapters for the two outbound collaborators:
//!
//! - [`GatewayClient`]: multi-part submission to the notification gateway.
//! - [`SeafileClient`]: workbook archiving through the Seafile upload-link API.
#![warn(missing_docs)]

mod gateway;
mod seafile;

pub use gateway::GatewayClient;
pub use seafile::SeafileClient;

use labsync_core::LabsyncError;

/// MIME type of the generated workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Build the shared `reqwest` client with a bounded connect timeout.
///
/// # Errors
/// Returns `Configuration` if the TLS backend cannot be initialized.
pub fn http_client(connect_timeout: std::time::Duration) -> Result<reqwest::Client, LabsyncError> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(concat!("labsync/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| LabsyncError::configuration(format!("http client: {e}")))
}
