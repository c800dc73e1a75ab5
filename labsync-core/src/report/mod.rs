//! Multi-sheet workbook assembled from one tenant's aggregate rows.
//!
//! Sheet order is fixed:
//! 1. per-facility summary
//! 2. per-district statistics
//! 3. raw result detail
//! 4. stale-pending detail
//! 5. unsynced-facility summary
//! 6. glossary
//!
//! Each sheet starts with two title rows (the localized title and the
//! reporting period) followed by a header row and one row per record.
//! The builder only produces bytes; persisting them is the dispatcher's job.

mod labels;
mod render;
/// District roll-up and percentage helpers.
pub mod stats;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    DISPLAY_DATETIME_FORMAT, DateInterval, LabsyncError, NotProcessedCause,
    PendingFacilitySummaryRow, ResultRow, ResultSummaryRow, TenantData,
};
use stats::{DistrictStats, district_stats};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Free text, including pre-formatted timestamps.
    Text(String),
    /// Non-negative integer count.
    Count(u64),
    /// Percentage in `[0, 100]`, rendered with two decimals.
    Percent(f64),
    /// Blank cell.
    Empty,
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    fn timestamp(ts: Option<NaiveDateTime>) -> Self {
        ts.map_or(Self::Empty, |t| {
            Self::Text(t.format(DISPLAY_DATETIME_FORMAT).to_string())
        })
    }
}

/// One worksheet before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Worksheet tab name.
    pub name: String,
    /// Title rows, top to bottom.
    pub titles: Vec<String>,
    /// Column headers.
    pub header: Vec<String>,
    /// Data rows; each has `header.len()` cells.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &str, titles: Vec<String>, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            titles,
            header: header.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Builds the report workbook for one tenant and interval.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder<'a> {
    interval: &'a DateInterval,
    data: &'a TenantData,
}

impl<'a> ReportBuilder<'a> {
    /// Create a builder over already-fetched rows.
    #[must_use]
    pub const fn new(interval: &'a DateInterval, data: &'a TenantData) -> Self {
        Self { interval, data }
    }

    /// The six sheets in their fixed order.
    #[must_use]
    pub fn sheets(&self) -> Vec<Sheet> {
        let start = self.interval.formatted_start();
        let end = self.interval.formatted_end();
        vec![
            self.summary_sheet(&start, &end),
            self.stats_sheet(&start, &end),
            self.results_sheet(&start, &end),
            self.stale_pending_sheet(&start, &end),
            self.unsynced_sheet(&start, &end),
            glossary_sheet(&start, &end),
        ]
    }

    /// Render the workbook to XLSX bytes.
    ///
    /// # Errors
    /// Returns `Report` if the XLSX writer rejects the content.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "labsync::report",
            skip(self),
            fields(
                summary = self.data.summary.len(),
                results = self.data.results.len(),
                stale_pending = self.data.stale_pending.len(),
            ),
        )
    )]
    pub fn build(&self) -> Result<Vec<u8>, LabsyncError> {
        render::write_workbook(&self.sheets())
    }

    fn summary_sheet(&self, start: &str, end: &str) -> Sheet {
        let mut sheet = Sheet::new(
            labels::SUMMARY_SHEET,
            vec![labels::summary_title(start, end), labels::period_line(start, end)],
            &labels::SUMMARY_HEADER,
        );
        sheet.rows = self.data.summary.iter().map(summary_row).collect();
        sheet
    }

    fn stats_sheet(&self, start: &str, end: &str) -> Sheet {
        let mut sheet = Sheet::new(
            labels::STATS_SHEET,
            vec![labels::stats_title(start, end), labels::period_line(start, end)],
            &labels::STATS_HEADER,
        );
        sheet.rows = district_stats(&self.data.summary)
            .iter()
            .map(stats_row)
            .collect();
        sheet
    }

    fn results_sheet(&self, start: &str, end: &str) -> Sheet {
        let mut sheet = Sheet::new(
            labels::RESULTS_SHEET,
            vec![labels::results_title(start, end), labels::period_line(start, end)],
            &labels::RESULTS_HEADER,
        );
        sheet.rows = self.data.results.iter().map(result_row).collect();
        sheet
    }

    fn stale_pending_sheet(&self, start: &str, end: &str) -> Sheet {
        let mut sheet = Sheet::new(
            labels::STALE_PENDING_SHEET,
            vec![
                labels::STALE_PENDING_TITLE.to_string(),
                labels::period_line(start, end),
            ],
            &labels::STALE_PENDING_HEADER,
        );
        sheet.rows = self.data.stale_pending.iter().map(stale_row).collect();
        sheet
    }

    fn unsynced_sheet(&self, start: &str, end: &str) -> Sheet {
        let mut sheet = Sheet::new(
            labels::UNSYNCED_SHEET,
            vec![labels::UNSYNCED_TITLE.to_string(), labels::period_line(start, end)],
            &labels::UNSYNCED_HEADER,
        );
        sheet.rows = self
            .data
            .unsynced_facilities
            .iter()
            .map(unsynced_row)
            .collect();
        sheet
    }
}

fn glossary_sheet(start: &str, end: &str) -> Sheet {
    let mut sheet = Sheet::new(
        labels::GLOSSARY_SHEET,
        vec![labels::GLOSSARY_TITLE.to_string(), labels::period_line(start, end)],
        &labels::GLOSSARY_HEADER,
    );
    sheet.rows = labels::GLOSSARY
        .iter()
        .map(|(term, definition)| vec![Cell::text(*term), Cell::text(*definition)])
        .collect();
    sheet
}

fn summary_row(r: &ResultSummaryRow) -> Vec<Cell> {
    vec![
        Cell::text(&r.district),
        Cell::text(&r.facility_code),
        Cell::text(&r.facility_name),
        Cell::Count(r.received),
        Cell::Count(r.processed),
        Cell::Count(r.pending),
        Cell::Count(r.not_processed.invalid_result),
        Cell::Count(r.not_processed.nid_not_found),
        Cell::Count(r.not_processed.duplicate_nid),
        Cell::Count(r.not_processed.duplicated_request_id),
    ]
}

fn stats_row(s: &DistrictStats) -> Vec<Cell> {
    let mut row = vec![
        Cell::text(&s.district),
        Cell::Count(s.processed),
        Cell::Percent(s.processed_pct()),
        Cell::Count(s.pending),
        Cell::Percent(s.pending_pct()),
    ];
    for cause in NotProcessedCause::ALL {
        row.push(Cell::Count(s.not_processed.get(cause)));
        row.push(Cell::Percent(s.cause_pct(cause)));
    }
    row.push(Cell::Count(s.received));
    row
}

fn result_row(r: &ResultRow) -> Vec<Cell> {
    let cause = r.effective_cause();
    vec![
        Cell::text(&r.request_id),
        Cell::text(&r.nid),
        Cell::text(&r.district),
        Cell::text(&r.facility_code),
        Cell::text(&r.facility_name),
        Cell::timestamp(Some(r.created_at)),
        Cell::timestamp(r.updated_at),
        Cell::text(r.status.as_str()),
        cause.map_or(Cell::Empty, |c| Cell::text(c.as_str())),
        cause.map_or(Cell::Empty, |c| Cell::text(labels::cause_note(c))),
    ]
}

fn stale_row(r: &ResultRow) -> Vec<Cell> {
    vec![
        Cell::text(&r.request_id),
        Cell::text(&r.nid),
        Cell::text(&r.district),
        Cell::text(&r.facility_code),
        Cell::text(&r.facility_name),
        Cell::timestamp(Some(r.created_at)),
        Cell::text(r.status.as_str()),
    ]
}

fn unsynced_row(r: &PendingFacilitySummaryRow) -> Vec<Cell> {
    vec![
        Cell::text(&r.district),
        Cell::text(&r.facility_code),
        Cell::text(&r.facility_name),
        Cell::Count(r.pending),
        Cell::timestamp(r.last_sync),
    ]
}
