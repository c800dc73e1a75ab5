//! Service settings: `labsync.toml` (or `$LABSYNC_CONFIG`) overlaid with
//! `LABSYNC__*` environment variables, e.g. `LABSYNC__DATABASE__URL`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use labsync::{ChannelKind, LabsyncConfig, LabsyncError};
use serde::Deserialize;

/// Default firing: Mondays at 06:00 in the report time zone.
pub const DEFAULT_SCHEDULE: &str = "0 0 6 * * Mon";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Notification gateway endpoint receiving the multi-part submission.
    pub endpoint: String,
    /// Sender address announced with each submission.
    pub sender: Option<String>,
    pub connect_timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            sender: None,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeafileSettings {
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub gateway: GatewaySettings,
    pub seafile: SeafileSettings,
    /// Six-field cron expression, seconds first.
    pub schedule: String,
    /// Directory holding `summary.hbs` / `no_results.hbs` overrides.
    pub template_dir: Option<PathBuf>,
    /// Per-call timeout in seconds; overrides `report.call_timeout`.
    pub call_timeout_secs: Option<u64>,
    pub report: LabsyncConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            gateway: GatewaySettings::default(),
            seafile: SeafileSettings::default(),
            schedule: DEFAULT_SCHEDULE.to_string(),
            template_dir: None,
            call_timeout_secs: None,
            report: LabsyncConfig::default(),
        }
    }
}

impl Settings {
    /// Load from the configured file (optional) and the environment.
    ///
    /// # Errors
    /// Returns `Configuration` if a source cannot be parsed.
    pub fn load() -> Result<Self, LabsyncError> {
        let path = std::env::var_os("LABSYNC_CONFIG")
            .map_or_else(|| PathBuf::from("labsync.toml"), PathBuf::from);
        Self::from_sources(&path, true)
    }

    pub(crate) fn from_sources(path: &Path, with_env: bool) -> Result<Self, LabsyncError> {
        let mut builder = Config::builder().add_source(File::from(path).required(false));
        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("LABSYNC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        }
        builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| LabsyncError::configuration(format!("settings: {e}")))
    }

    /// Check that everything the selected channel needs is present.
    ///
    /// # Errors
    /// Returns `Configuration` naming the first missing setting.
    pub fn validate(&self) -> Result<(), LabsyncError> {
        let mut required = vec![("database.url", &self.database.url)];
        if self.report.channel == ChannelKind::Gateway {
            required.extend([
                ("gateway.endpoint", &self.gateway.endpoint),
                ("seafile.base_url", &self.seafile.base_url),
                ("seafile.token", &self.seafile.token),
            ]);
        }
        match required.into_iter().find(|(_, v)| v.trim().is_empty()) {
            Some((key, _)) => Err(LabsyncError::configuration(format!("{key} is required"))),
            None => Ok(()),
        }
    }
}
