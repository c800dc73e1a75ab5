//! Configuration types shared by the orchestrator and the service binary.

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// How the reporting window is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalMode {
    /// Previous calendar week, Sunday 00:00:00 through Saturday 23:59:59.
    #[default]
    Default,
    /// Explicit `start_date`/`end_date` (yyyy-MM-dd).
    Custom,
}

/// Which delivery channel a batch uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Archive to the document repository and submit to the notification gateway.
    #[default]
    #[serde(alias = "javaMail")]
    Gateway,
    /// Write the workbook to the local output directory only.
    #[serde(alias = "fileSystem")]
    FileSystem,
}

/// Reporting-window settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalSettings {
    /// `default` or `custom`.
    #[serde(alias = "reportDateInterval")]
    pub report_date_interval: IntervalMode,
    /// First day of a custom window (yyyy-MM-dd).
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    /// Last day of a custom window (yyyy-MM-dd).
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
}

/// Global configuration for the `Labsync` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabsyncConfig {
    /// Reporting-window settings.
    pub interval: IntervalSettings,
    /// Delivery channel.
    #[serde(alias = "mailservice")]
    pub channel: ChannelKind,
    /// Attachment name prefix for the gateway channel.
    pub attachment_prefix: String,
    /// Module tag sent to the gateway.
    pub module: String,
    /// Timeout applied to every individual external call.
    pub call_timeout: Duration,
    /// Upper bound on tenants processed at the same time (1 = sequential).
    pub max_concurrent_tenants: usize,
    /// Time zone in which "previous week" is computed.
    pub timezone: Tz,
    /// Parent directory for scoped temporary artifacts; system temp dir when `None`.
    pub temp_dir: Option<PathBuf>,
    /// Destination directory for the file-system channel.
    pub output_dir: PathBuf,
}

impl Default for LabsyncConfig {
    fn default() -> Self {
        Self {
            interval: IntervalSettings::default(),
            channel: ChannelKind::default(),
            attachment_prefix: "CSaude_Resultados_SI-SESP".to_string(),
            module: "notification".to_string(),
            call_timeout: Duration::from_secs(30),
            max_concurrent_tenants: 1,
            timezone: chrono_tz::Africa::Maputo,
            temp_dir: None,
            output_dir: PathBuf::from("."),
        }
    }
}
