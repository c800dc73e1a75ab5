//! Archive-and-submit protocol for the gateway channel.
//!
//! An attachment is written into a private temporary directory, uploaded to
//! the tenant's document repository, then referenced by the gateway
//! submission. The directory is removed when the [`ScopedArtifact`] is
//! dropped, so the file is gone on every exit path including cancellation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use labsync_core::connector::{DocumentRepository, NotificationGateway};
use labsync_core::{ArtifactRef, Attachment, LabsyncError, Notification, Stage, Tenant};
use tempfile::TempDir;

use super::Delivery;
use crate::core::call_with_timeout;

/// A workbook written to disk for the duration of one dispatch.
#[derive(Debug)]
pub struct ScopedArtifact {
    dir: TempDir,
    artifact: ArtifactRef,
}

impl ScopedArtifact {
    /// Write `attachment` into a fresh temporary directory under `parent`
    /// (the system temp dir when `None`).
    ///
    /// # Errors
    /// Returns `Io` if the directory or the file cannot be created.
    pub async fn write(parent: Option<&Path>, attachment: &Attachment) -> Result<Self, LabsyncError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("labsync-");
        let dir = match parent {
            Some(p) => builder.tempdir_in(p),
            None => builder.tempdir(),
        }
        .map_err(|e| LabsyncError::Io(format!("temp dir: {e}")))?;

        let path = dir.path().join(&attachment.name);
        tokio::fs::write(&path, &attachment.bytes)
            .await
            .map_err(|e| LabsyncError::Io(format!("write {}: {e}", path.display())))?;

        Ok(Self {
            dir,
            artifact: ArtifactRef {
                name: attachment.name.clone(),
                path,
            },
        })
    }

    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.artifact.path
    }

    /// Reference handed to the gateway.
    #[must_use]
    pub const fn artifact(&self) -> &ArtifactRef {
        &self.artifact
    }

    /// Remove the directory now, surfacing any removal error.
    ///
    /// # Errors
    /// Returns `Io` if the directory could not be removed.
    pub fn close(self) -> Result<(), LabsyncError> {
        let shown: PathBuf = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|e| LabsyncError::Io(format!("remove {}: {e}", shown.display())))
    }
}

/// Uploads attachments and submits notifications, each call bounded by a timeout.
#[derive(Clone)]
pub struct Dispatcher {
    repository: Arc<dyn DocumentRepository>,
    gateway: Arc<dyn NotificationGateway>,
    call_timeout: Duration,
    temp_dir: Option<PathBuf>,
}

impl Dispatcher {
    /// Dispatcher writing temporary artifacts under `temp_dir` (system temp dir when `None`).
    #[must_use]
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        gateway: Arc<dyn NotificationGateway>,
        call_timeout: Duration,
        temp_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            repository,
            gateway,
            call_timeout,
            temp_dir,
        }
    }

    /// Deliver `notification` for `tenant`.
    ///
    /// With an attachment the workbook is archived first. An upload failure
    /// does not stop the submission; it is returned as a warning instead.
    ///
    /// # Errors
    /// Returns `Io` if the artifact cannot be written, or `Dispatch`/`Timeout`
    /// if the gateway rejects or never answers the submission.
    #[tracing::instrument(
        target = "labsync::dispatch",
        skip_all,
        fields(tenant = %tenant.name, has_results = notification.has_results),
    )]
    pub async fn dispatch(
        &self,
        tenant: &Tenant,
        mut notification: Notification,
        attachment: Option<Attachment>,
    ) -> Result<Delivery, LabsyncError> {
        let Some(attachment) = attachment else {
            self.submit(&notification).await?;
            return Ok(Delivery::default());
        };

        let scoped = ScopedArtifact::write(self.temp_dir.as_deref(), &attachment).await?;
        let mut warnings = Vec::new();

        match call_with_timeout(
            Stage::Upload,
            self.call_timeout,
            self.repository.upload(&tenant.repo_id, scoped.path()),
        )
        .await
        {
            Ok(receipt) => {
                tracing::debug!(repo_id = %tenant.repo_id, receipt = %receipt.0, "artifact archived");
            }
            Err(e) => {
                tracing::warn!(
                    repo_id = %tenant.repo_id,
                    stage = %e.stage(),
                    error = %e,
                    "archive upload failed; submitting anyway"
                );
                warnings.push(e);
            }
        }

        notification.attachment = Some(scoped.artifact().clone());
        self.submit(&notification).await?;

        if let Err(e) = scoped.close() {
            tracing::warn!(error = %e, "temporary artifact cleanup failed");
            warnings.push(e);
        }
        Ok(Delivery {
            warnings,
            saved_to: None,
        })
    }

    async fn submit(&self, notification: &Notification) -> Result<(), LabsyncError> {
        let receipt = call_with_timeout(
            Stage::Submit,
            self.call_timeout,
            self.gateway.submit(notification),
        )
        .await?;
        tracing::debug!(status = receipt.status, "gateway accepted notification");
        Ok(())
    }
}
