use async_trait::async_trait;
use labsync_core::connector::NotificationGateway;
use labsync_core::{GatewayReceipt, LabsyncError, Notification};
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::XLSX_MIME;

/// Client for the remote notification gateway.
///
/// Sends one multi-part form per notification; any 2xx is success.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    endpoint: Url,
    sender: Option<String>,
}

impl GatewayClient {
    /// Create a client posting to `endpoint`.
    #[must_use]
    pub const fn new(http: reqwest::Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            sender: None,
        }
    }

    /// Announce a sender address with every submission.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Text fields of the form, in submission order. Recipients repeat the
    /// `mailList` field once per address.
    #[must_use]
    pub fn text_fields(&self, n: &Notification) -> Vec<(&'static str, String)> {
        let mut fields: Vec<(&'static str, String)> = n
            .recipients
            .iter()
            .map(|r| ("mailList", r.clone()))
            .collect();
        fields.extend([
            ("subject", n.subject.clone()),
            ("body", n.html_body.clone()),
            ("module", n.module.clone()),
            ("startDate", n.start_date.clone()),
            ("endDate", n.end_date.clone()),
            ("repoLink", n.repo_link.clone()),
            ("resultFlag", n.has_results.to_string()),
        ]);
        if let Some(a) = &n.attachment {
            fields.push(("attachmentName", a.name.clone()));
        }
        if let Some(sender) = &self.sender {
            fields.push(("from", sender.clone()));
        }
        fields
    }

    async fn form(&self, n: &Notification) -> Result<Form, LabsyncError> {
        let mut form = Form::new();
        for (name, value) in self.text_fields(n) {
            form = form.text(name, value);
        }
        if let Some(a) = &n.attachment {
            let bytes = tokio::fs::read(&a.path).await.map_err(|e| {
                LabsyncError::dispatch(None, format!("reading attachment {}: {e}", a.path.display()))
            })?;
            let part = Part::bytes(bytes)
                .file_name(a.name.clone())
                .mime_str(XLSX_MIME)
                .map_err(|e| LabsyncError::dispatch(None, e.to_string()))?;
            form = form.part("file", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl NotificationGateway for GatewayClient {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "labsync::gateway",
            skip(self, notification),
            fields(
                endpoint = %self.endpoint,
                recipients = notification.recipients.len(),
                has_results = notification.has_results,
            ),
        )
    )]
    async fn submit(&self, notification: &Notification) -> Result<GatewayReceipt, LabsyncError> {
        let form = self.form(notification).await?;
        let resp = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| LabsyncError::dispatch(None, e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(LabsyncError::dispatch(
                Some(status.as_u16()),
                format!("gateway answered {status}: {body}"),
            ));
        }
        Ok(GatewayReceipt {
            status: status.as_u16(),
            body,
        })
    }
}
