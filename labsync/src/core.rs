use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use labsync_core::connector::{
    DocumentRepository, NotificationGateway, ResultsSource, TenantDirectory,
};
use labsync_core::{
    ChannelKind, Composer, IntervalSettings, LabsyncConfig, LabsyncError, Stage, TemplateEngine,
};

use crate::channel::dispatch::Dispatcher;
use crate::channel::{FileSystemChannel, GatewayChannel, ReportChannel};

/// Orchestrator that runs one reporting batch per firing across all tenants.
pub struct Labsync {
    pub(crate) directory: Arc<dyn TenantDirectory>,
    pub(crate) source: Arc<dyn ResultsSource>,
    pub(crate) channel: Arc<dyn ReportChannel>,
    pub(crate) cfg: LabsyncConfig,
}

/// Builder for constructing a `Labsync` orchestrator.
pub struct LabsyncBuilder {
    directory: Option<Arc<dyn TenantDirectory>>,
    source: Option<Arc<dyn ResultsSource>>,
    gateway: Option<Arc<dyn NotificationGateway>>,
    repository: Option<Arc<dyn DocumentRepository>>,
    templates: Option<Arc<TemplateEngine>>,
    channel: Option<Arc<dyn ReportChannel>>,
    cfg: LabsyncConfig,
}

impl Default for LabsyncBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LabsyncBuilder {
    /// Create a new builder with [`LabsyncConfig::default`].
    ///
    /// Defaults: previous-week interval, gateway channel, sequential tenants,
    /// 30s per-call timeout, built-in templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            directory: None,
            source: None,
            gateway: None,
            repository: None,
            templates: None,
            channel: None,
            cfg: LabsyncConfig::default(),
        }
    }

    /// Register the tenant directory consulted at the start of every firing.
    #[must_use]
    pub fn with_tenant_directory(mut self, d: Arc<dyn TenantDirectory>) -> Self {
        self.directory = Some(d);
        self
    }

    /// Register the data source answering the four aggregate queries.
    #[must_use]
    pub fn with_results_source(mut self, s: Arc<dyn ResultsSource>) -> Self {
        self.source = Some(s);
        self
    }

    /// Register the notification gateway (gateway channel only).
    #[must_use]
    pub fn with_gateway(mut self, g: Arc<dyn NotificationGateway>) -> Self {
        self.gateway = Some(g);
        self
    }

    /// Register the document repository (gateway channel only).
    #[must_use]
    pub fn with_repository(mut self, r: Arc<dyn DocumentRepository>) -> Self {
        self.repository = Some(r);
        self
    }

    /// Use a pre-loaded template engine instead of the built-in templates.
    ///
    /// The engine is shared read-only by every tenant in every firing.
    #[must_use]
    pub fn template_engine(mut self, engine: Arc<TemplateEngine>) -> Self {
        self.templates = Some(engine);
        self
    }

    /// Replace the configured channel with a custom one.
    ///
    /// When set, `channel`, the gateway and the repository are ignored.
    #[must_use]
    pub fn with_channel(mut self, channel: Arc<dyn ReportChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: LabsyncConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Reporting-window settings.
    #[must_use]
    pub fn interval(mut self, settings: IntervalSettings) -> Self {
        self.cfg.interval = settings;
        self
    }

    /// Delivery channel.
    #[must_use]
    pub const fn channel(mut self, kind: ChannelKind) -> Self {
        self.cfg.channel = kind;
        self
    }

    /// Timeout applied to every individual external call.
    #[must_use]
    pub const fn call_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.call_timeout = timeout;
        self
    }

    /// Bound on tenants processed at the same time. `1` keeps the sequential baseline.
    #[must_use]
    pub const fn max_concurrent_tenants(mut self, n: usize) -> Self {
        self.cfg.max_concurrent_tenants = n;
        self
    }

    /// Time zone in which "today" is taken when resolving the interval.
    #[must_use]
    pub const fn timezone(mut self, tz: Tz) -> Self {
        self.cfg.timezone = tz;
        self
    }

    /// Attachment name prefix.
    #[must_use]
    pub fn attachment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cfg.attachment_prefix = prefix.into();
        self
    }

    /// Module tag sent with each notification.
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.cfg.module = module.into();
        self
    }

    /// Parent directory for scoped temporary artifacts.
    #[must_use]
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.temp_dir = Some(dir.into());
        self
    }

    /// Output directory for the file-system channel.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.output_dir = dir.into();
        self
    }

    /// Build the `Labsync` orchestrator.
    ///
    /// # Errors
    /// Returns `Configuration` when a required collaborator is missing for the
    /// selected channel, when the concurrency bound or the call timeout is
    /// zero, or when the built-in templates fail to register.
    pub fn build(self) -> Result<Labsync, LabsyncError> {
        let Some(directory) = self.directory else {
            return Err(LabsyncError::configuration(
                "no tenant directory registered; add one via with_tenant_directory(...)",
            ));
        };
        let Some(source) = self.source else {
            return Err(LabsyncError::configuration(
                "no results source registered; add one via with_results_source(...)",
            ));
        };
        if self.cfg.max_concurrent_tenants == 0 {
            return Err(LabsyncError::configuration(
                "max_concurrent_tenants must be at least 1",
            ));
        }
        if self.cfg.call_timeout.is_zero() {
            return Err(LabsyncError::configuration("call_timeout must be non-zero"));
        }

        let channel: Arc<dyn ReportChannel> = match (self.channel, self.cfg.channel) {
            (Some(custom), _) => custom,
            (None, ChannelKind::FileSystem) => {
                Arc::new(FileSystemChannel::new(self.cfg.output_dir.clone()))
            }
            (None, ChannelKind::Gateway) => {
                let (Some(gateway), Some(repository)) = (self.gateway, self.repository) else {
                    return Err(LabsyncError::configuration(
                        "gateway channel needs both with_gateway(...) and with_repository(...)",
                    ));
                };
                let engine = match self.templates {
                    Some(e) => e,
                    None => Arc::new(TemplateEngine::builtin()?),
                };
                let dispatcher = Dispatcher::new(
                    repository,
                    gateway,
                    self.cfg.call_timeout,
                    self.cfg.temp_dir.clone(),
                );
                Arc::new(GatewayChannel::new(
                    Composer::new(engine, self.cfg.attachment_prefix.clone()),
                    dispatcher,
                    self.cfg.module.clone(),
                ))
            }
        };

        Ok(Labsync {
            directory,
            source,
            channel,
            cfg: self.cfg,
        })
    }
}

/// Bound `fut` by `timeout`, mapping expiry to a `Timeout` error for `stage`.
pub(crate) async fn call_with_timeout<T, Fut>(
    stage: Stage,
    timeout: Duration,
    fut: Fut,
) -> Result<T, LabsyncError>
where
    Fut: core::future::Future<Output = Result<T, LabsyncError>>,
{
    (tokio::time::timeout(timeout, fut).await)
        .unwrap_or_else(|_| Err(LabsyncError::timeout(stage, timeout)))
}

impl Labsync {
    /// Start building a new `Labsync` instance.
    ///
    /// ```rust,ignore
    /// let labsync = labsync::Labsync::builder()
    ///     .with_tenant_directory(directory)
    ///     .with_results_source(source)
    ///     .with_gateway(gateway)
    ///     .with_repository(repository)
    ///     .max_concurrent_tenants(4)
    ///     .build()?;
    /// let report = labsync.run_batch().await?;
    /// ```
    #[must_use]
    pub fn builder() -> LabsyncBuilder {
        LabsyncBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &LabsyncConfig {
        &self.cfg
    }

    /// Name of the active delivery channel.
    #[must_use]
    pub fn channel_name(&self) -> &'static str {
        self.channel.name()
    }
}
