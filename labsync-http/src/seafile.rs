use std::path::Path;

use async_trait::async_trait;
use labsync_core::connector::DocumentRepository;
use labsync_core::{LabsyncError, UploadReceipt};
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::XLSX_MIME;

/// Seafile document-repository client.
///
/// Uploads go in two steps: request a one-shot upload link for the
/// repository, then post the file to that link into the repository root.
#[derive(Debug, Clone)]
pub struct SeafileClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl SeafileClient {
    /// Create a client for the server at `base` authenticating with an API token.
    #[must_use]
    pub fn new(http: reqwest::Client, mut base: Url, token: impl Into<String>) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            http,
            base,
            token: token.into(),
        }
    }

    fn auth(&self) -> String {
        format!("Token {}", self.token)
    }

    /// `{base}/api2/repos/{repo_id}/upload-link/?p=/`
    ///
    /// # Errors
    /// Returns `StorageUpload` if `repo_id` cannot form a valid URL.
    pub fn upload_link_url(&self, repo_id: &str) -> Result<Url, LabsyncError> {
        let mut url = self
            .base
            .join(&format!("api2/repos/{repo_id}/upload-link/"))
            .map_err(|e| LabsyncError::storage_upload(repo_id, e.to_string()))?;
        url.query_pairs_mut().append_pair("p", "/");
        Ok(url)
    }

    async fn upload_link(&self, repo_id: &str) -> Result<Url, LabsyncError> {
        let fail = |msg: String| LabsyncError::storage_upload(repo_id, msg);
        let resp = self
            .http
            .get(self.upload_link_url(repo_id)?)
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .await
            .map_err(|e| fail(format!("upload link request: {e}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| fail(format!("upload link body: {e}")))?;
        if !status.is_success() {
            return Err(fail(format!("upload link answered {status}: {body}")));
        }
        let link: String = serde_json::from_str(&body)
            .map_err(|e| fail(format!("upload link is not a JSON string: {e}: {body}")))?;
        Url::parse(&link).map_err(|e| fail(format!("invalid upload link {link:?}: {e}")))
    }
}

#[async_trait]
impl DocumentRepository for SeafileClient {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "labsync::seafile",
            skip(self, path),
            fields(path = %path.display()),
        )
    )]
    async fn upload(&self, repo_id: &str, path: &Path) -> Result<UploadReceipt, LabsyncError> {
        let fail = |msg: String| LabsyncError::storage_upload(repo_id, msg);
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| fail(format!("{} has no file name", path.display())))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| fail(format!("reading {}: {e}", path.display())))?;
        let link = self.upload_link(repo_id).await?;

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(XLSX_MIME)
            .map_err(|e| fail(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("parent_dir", "/")
            .text("replace", "1");
        let resp = self
            .http
            .post(link)
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .multipart(form)
            .send()
            .await
            .map_err(|e| fail(format!("upload request: {e}")))?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(fail(format!("upload answered {status}: {body}")));
        }
        Ok(UploadReceipt(body))
    }
}
