use async_trait::async_trait;
use labsync_core::{
    Attachment, ComposedNotification, Composer, LabsyncError, Notification, ReportBuilder,
    TenantData,
};

use super::dispatch::Dispatcher;
use super::{Delivery, ReportChannel, TenantJob};

/// Archives the workbook and submits a notification through the gateway.
pub struct GatewayChannel {
    composer: Composer,
    dispatcher: Dispatcher,
    module: String,
}

impl GatewayChannel {
    /// Channel composing with `composer` and delivering through `dispatcher`.
    #[must_use]
    pub fn new(composer: Composer, dispatcher: Dispatcher, module: impl Into<String>) -> Self {
        Self {
            composer,
            dispatcher,
            module: module.into(),
        }
    }

    fn notification(&self, job: TenantJob<'_>, composed: ComposedNotification) -> Notification {
        Notification {
            recipients: job.tenant.recipients.clone(),
            subject: composed.subject,
            html_body: composed.html_body,
            module: self.module.clone(),
            attachment: None,
            start_date: job.interval.formatted_start(),
            end_date: job.interval.formatted_end(),
            repo_link: job.tenant.repo_link.clone(),
            has_results: composed.flow.has_results(),
        }
    }
}

#[async_trait]
impl ReportChannel for GatewayChannel {
    fn name(&self) -> &'static str {
        "gateway"
    }

    async fn send_report(
        &self,
        job: TenantJob<'_>,
        data: &TenantData,
    ) -> Result<Delivery, LabsyncError> {
        let bytes = ReportBuilder::new(job.interval, data).build()?;
        let composed = self
            .composer
            .standard(&job.tenant.name, job.interval, &data.summary)?;
        let attachment = composed
            .attachment_name
            .clone()
            .map(|name| Attachment { name, bytes });
        let notification = self.notification(job, composed);
        self.dispatcher
            .dispatch(job.tenant, notification, attachment)
            .await
    }

    async fn send_no_results(&self, job: TenantJob<'_>) -> Result<Delivery, LabsyncError> {
        let composed = self.composer.no_results(job.interval)?;
        let notification = self.notification(job, composed);
        self.dispatcher.dispatch(job.tenant, notification, None).await
    }
}
