use std::sync::Arc;
use std::time::Duration;

use labsync::{ChannelKind, Labsync, LabsyncError, TemplateEngine};
use labsync_http::{GatewayClient, SeafileClient, http_client};
use labsync_sql::SqlConnector;
use sqlx::mysql::MySqlPoolOptions;
use url::Url;

use crate::settings::Settings;

fn parse_url(key: &str, raw: &str) -> Result<Url, LabsyncError> {
    Url::parse(raw).map_err(|e| LabsyncError::configuration(format!("{key}: {e}")))
}

/// Assemble the orchestrator from settings.
///
/// The database pool connects lazily; an unreachable database shows up as
/// an enumeration failure on the first firing.
pub fn build(settings: &Settings) -> Result<Labsync, LabsyncError> {
    let mut cfg = settings.report.clone();
    if let Some(secs) = settings.call_timeout_secs {
        cfg.call_timeout = Duration::from_secs(secs);
    }

    let pool = MySqlPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(cfg.call_timeout)
        .connect_lazy(&settings.database.url)
        .map_err(|e| LabsyncError::configuration(format!("database.url: {e}")))?;
    let sql = Arc::new(SqlConnector::new(pool));

    let templates = match &settings.template_dir {
        Some(dir) => TemplateEngine::from_dir(dir)?,
        None => TemplateEngine::builtin()?,
    };

    let mut builder = Labsync::builder()
        .config(cfg.clone())
        .with_tenant_directory(Arc::clone(&sql) as _)
        .with_results_source(sql)
        .template_engine(Arc::new(templates));

    if cfg.channel == ChannelKind::Gateway {
        let http = http_client(Duration::from_secs(settings.gateway.connect_timeout_secs))?;
        let mut gateway = GatewayClient::new(
            http.clone(),
            parse_url("gateway.endpoint", &settings.gateway.endpoint)?,
        );
        if let Some(sender) = &settings.gateway.sender {
            gateway = gateway.with_sender(sender.clone());
        }
        let repository = SeafileClient::new(
            http,
            parse_url("seafile.base_url", &settings.seafile.base_url)?,
            settings.seafile.token.clone(),
        );
        builder = builder
            .with_gateway(Arc::new(gateway))
            .with_repository(Arc::new(repository));
    }

    builder.build()
}
