//! Workspace-wide error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stage::Stage;

/// Unified error type for the labsync workspace.
///
/// Each variant tags one failure class of the pipeline. Everything except
/// `Configuration` and `Enumeration` is tenant-scoped: the orchestrator
/// records it on the tenant's outcome and moves on.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LabsyncError {
    /// Malformed or missing configuration (e.g. custom interval bounds).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The tenant directory could not be read.
    #[error("tenant enumeration failed: {0}")]
    Enumeration(String),

    /// The data source was unreachable or a query failed.
    #[error("{stage} query failed: {msg}")]
    Aggregation {
        /// Which of the aggregate queries failed.
        stage: Stage,
        /// Human-readable error message.
        msg: String,
    },

    /// A template could not be registered or rendered.
    #[error("failed to render template {template}: {msg}")]
    Render {
        /// Template name (e.g. "summary").
        template: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The workbook could not be assembled.
    #[error("failed to build report: {0}")]
    Report(String),

    /// Upload to the document repository failed.
    #[error("upload to repository {repo_id} failed: {msg}")]
    StorageUpload {
        /// Repository the artifact was destined for.
        repo_id: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The gateway rejected the notification or could not be reached.
    #[error("dispatch failed: {msg}")]
    Dispatch {
        /// HTTP status when the gateway answered with a non-success code.
        status: Option<u16>,
        /// Human-readable error message.
        msg: String,
    },

    /// Local filesystem fault (temp artifact, output directory).
    #[error("i/o error: {0}")]
    Io(String),

    /// An individual external call exceeded the configured timeout.
    #[error("{stage} timed out after {timeout_ms}ms")]
    Timeout {
        /// Stage whose call timed out.
        stage: Stage,
        /// Timeout that was applied, in milliseconds.
        timeout_ms: u64,
    },
}

impl LabsyncError {
    /// Helper: build a `Configuration` error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Helper: build an `Aggregation` error for a query stage.
    pub fn aggregation(stage: Stage, msg: impl Into<String>) -> Self {
        Self::Aggregation {
            stage,
            msg: msg.into(),
        }
    }

    /// Helper: build a `Render` error for a template name.
    pub fn render(template: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `StorageUpload` error.
    pub fn storage_upload(repo_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::StorageUpload {
            repo_id: repo_id.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Dispatch` error, optionally carrying the gateway status.
    pub fn dispatch(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Dispatch {
            status,
            msg: msg.into(),
        }
    }

    /// Helper: build a `Timeout` error for a stage.
    #[must_use]
    pub fn timeout(stage: Stage, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            stage,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// The pipeline stage this error belongs to.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Configuration(_) => Stage::ResolveInterval,
            Self::Enumeration(_) => Stage::EnumerateTenants,
            Self::Aggregation { stage, .. } | Self::Timeout { stage, .. } => *stage,
            Self::Render { .. } => Stage::Render,
            Self::Report(_) => Stage::BuildReport,
            Self::StorageUpload { .. } => Stage::Upload,
            Self::Dispatch { .. } => Stage::Submit,
            Self::Io(_) => Stage::WriteArtifact,
        }
    }

    /// True for query faults and query timeouts.
    ///
    /// These must never be confused with a legitimately empty result.
    #[must_use]
    pub const fn is_aggregation(&self) -> bool {
        match self {
            Self::Aggregation { .. } => true,
            Self::Timeout { stage, .. } => stage.is_aggregation(),
            _ => false,
        }
    }

    /// True for gateway rejections, transport faults and submit timeouts.
    #[must_use]
    pub const fn is_dispatch(&self) -> bool {
        matches!(
            self,
            Self::Dispatch { .. }
                | Self::Timeout {
                    stage: Stage::Submit,
                    ..
                }
        )
    }

    /// True when the whole firing must stop before any tenant is touched.
    #[must_use]
    pub const fn is_fatal_to_batch(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Enumeration(_))
    }
}

impl From<std::io::Error> for LabsyncError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
