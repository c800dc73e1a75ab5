//! labsync-core
//!
//! Core traits and pure building blocks of the labsync reporting pipeline.
//!
//! - `types`: re-exports of the shared DTOs from `labsync-types`.
//! - `connector`: role traits for the external collaborators (data source,
//!   tenant directory, document repository, notification gateway).
//! - `interval`: reporting-window resolution.
//! - `report`: the multi-sheet workbook model and its XLSX rendering.
//! - `compose`: HTML body, subject and attachment naming for both flows.
//!
//! Nothing in this crate performs I/O on its own; the orchestrator in the
//! `labsync` crate drives the collaborators.
#![warn(missing_docs)]

/// Notification composition and the shared template engine.
pub mod compose;
/// Role traits implemented by data-source, repository and gateway adapters.
pub mod connector;
/// Reporting-window resolution.
pub mod interval;
/// Workbook model, district statistics and XLSX rendering.
pub mod report;
pub mod types;

pub use compose::{Composer, TemplateEngine, attachment_name, file_segment, subject};
pub use connector::{DocumentRepository, NotificationGateway, ResultsSource, TenantDirectory};
pub use interval::{previous_week, resolve, resolve_now};
pub use report::{Cell, ReportBuilder, Sheet};
pub use report::stats::{DistrictStats, district_stats, percent};
pub use types::*;
