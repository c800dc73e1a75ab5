use std::path::PathBuf;

use async_trait::async_trait;
use labsync_core::{DateInterval, LabsyncError, ReportBuilder, TenantData, file_segment};

use super::{Delivery, ReportChannel, TenantJob};

/// Keeps the workbook on local disk; sends nothing.
///
/// Files land in `<output_dir>/<TENANT>/viral_Result_from_<start>_To_<end>.xlsx`,
/// with the tenant directory named by [`file_segment`].
#[derive(Debug, Clone)]
pub struct FileSystemChannel {
    output_dir: PathBuf,
}

impl FileSystemChannel {
    /// Channel writing under `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Workbook file name for `interval`.
    #[must_use]
    pub fn file_name(interval: &DateInterval) -> String {
        format!(
            "viral_Result_from_{}_To_{}.xlsx",
            interval.formatted_start(),
            interval.formatted_end()
        )
    }
}

#[async_trait]
impl ReportChannel for FileSystemChannel {
    fn name(&self) -> &'static str {
        "file_system"
    }

    async fn send_report(
        &self,
        job: TenantJob<'_>,
        data: &TenantData,
    ) -> Result<Delivery, LabsyncError> {
        let bytes = ReportBuilder::new(job.interval, data).build()?;
        let dir = self.output_dir.join(file_segment(&job.tenant.name));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| LabsyncError::Io(format!("create {}: {e}", dir.display())))?;
        let path = dir.join(Self::file_name(job.interval));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| LabsyncError::Io(format!("write {}: {e}", path.display())))?;
        tracing::info!(tenant = %job.tenant.name, path = %path.display(), "report saved");
        Ok(Delivery {
            warnings: Vec::new(),
            saved_to: Some(path),
        })
    }

    async fn send_no_results(&self, job: TenantJob<'_>) -> Result<Delivery, LabsyncError> {
        tracing::info!(tenant = %job.tenant.name, "no results to generate xls");
        Ok(Delivery::default())
    }
}
