//! Aggregate and detail rows returned by the data source.

use core::fmt;
use core::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::reports::ReportFlow;

/// Processing status of a result record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    /// Delivered to the point-of-care system.
    Processed,
    /// Not yet picked up.
    Pending,
    /// Rejected; see [`NotProcessedCause`].
    NotProcessed,
}

impl ResultStatus {
    /// Wire/database label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "PROCESSED",
            Self::Pending => "PENDING",
            Self::NotProcessed => "NOT_PROCESSED",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSED" => Ok(Self::Processed),
            "PENDING" => Ok(Self::Pending),
            "NOT_PROCESSED" => Ok(Self::NotProcessed),
            other => Err(format!("unknown result status: {other}")),
        }
    }
}

/// Reason a result was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotProcessedCause {
    /// Patient identifier unknown downstream.
    NidNotFound,
    /// Result value could not be interpreted.
    InvalidResult,
    /// Patient identifier matches more than one patient.
    DuplicateNid,
    /// Request id was already received.
    DuplicatedRequestId,
}

impl NotProcessedCause {
    /// All causes in report column order.
    pub const ALL: [Self; 4] = [
        Self::InvalidResult,
        Self::NidNotFound,
        Self::DuplicateNid,
        Self::DuplicatedRequestId,
    ];

    /// Wire/database label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NidNotFound => "NID_NOT_FOUND",
            Self::InvalidResult => "INVALID_RESULT",
            Self::DuplicateNid => "DUPLICATE_NID",
            Self::DuplicatedRequestId => "DUPLICATED_REQUEST_ID",
        }
    }
}

impl fmt::Display for NotProcessedCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotProcessedCause {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NID_NOT_FOUND" => Ok(Self::NidNotFound),
            "INVALID_RESULT" => Ok(Self::InvalidResult),
            "DUPLICATE_NID" => Ok(Self::DuplicateNid),
            "DUPLICATED_REQUEST_ID" => Ok(Self::DuplicatedRequestId),
            other => Err(format!("unknown not-processed cause: {other}")),
        }
    }
}

/// Not-processed counts broken down by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseCounts {
    /// `NID_NOT_FOUND`
    pub nid_not_found: u64,
    /// `INVALID_RESULT`
    pub invalid_result: u64,
    /// `DUPLICATE_NID`
    pub duplicate_nid: u64,
    /// `DUPLICATED_REQUEST_ID`
    pub duplicated_request_id: u64,
}

impl CauseCounts {
    /// Count for a single cause.
    #[must_use]
    pub const fn get(&self, cause: NotProcessedCause) -> u64 {
        match cause {
            NotProcessedCause::NidNotFound => self.nid_not_found,
            NotProcessedCause::InvalidResult => self.invalid_result,
            NotProcessedCause::DuplicateNid => self.duplicate_nid,
            NotProcessedCause::DuplicatedRequestId => self.duplicated_request_id,
        }
    }

    /// Add `n` to the count of one cause.
    pub const fn add(&mut self, cause: NotProcessedCause, n: u64) {
        match cause {
            NotProcessedCause::NidNotFound => self.nid_not_found += n,
            NotProcessedCause::InvalidResult => self.invalid_result += n,
            NotProcessedCause::DuplicateNid => self.duplicate_nid += n,
            NotProcessedCause::DuplicatedRequestId => self.duplicated_request_id += n,
        }
    }

    /// Sum over all causes.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.nid_not_found + self.invalid_result + self.duplicate_nid + self.duplicated_request_id
    }

    /// Component-wise sum.
    #[must_use]
    pub const fn plus(self, other: Self) -> Self {
        Self {
            nid_not_found: self.nid_not_found + other.nid_not_found,
            invalid_result: self.invalid_result + other.invalid_result,
            duplicate_nid: self.duplicate_nid + other.duplicate_nid,
            duplicated_request_id: self.duplicated_request_id + other.duplicated_request_id,
        }
    }
}

/// Per-facility aggregate over the reporting interval.
///
/// Invariant: `not_processed.total() <= received`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummaryRow {
    /// District name.
    pub district: String,
    /// Facility lab code.
    pub facility_code: String,
    /// Facility name.
    pub facility_name: String,
    /// Records received in the interval.
    pub received: u64,
    /// Records processed.
    pub processed: u64,
    /// Records still pending.
    pub pending: u64,
    /// Records rejected, by cause.
    pub not_processed: CauseCounts,
}

/// One result record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Lab request id.
    pub request_id: String,
    /// Patient identifier (NID).
    pub nid: String,
    /// Patient first name.
    pub first_name: Option<String>,
    /// Patient surname.
    pub last_name: Option<String>,
    /// District name.
    pub district: String,
    /// Facility lab code.
    pub facility_code: String,
    /// Facility name.
    pub facility_name: String,
    /// When the record reached the central store.
    pub created_at: NaiveDateTime,
    /// Last update, if any.
    pub updated_at: Option<NaiveDateTime>,
    /// Processing status.
    pub status: ResultStatus,
    /// Stored cause; only meaningful when `status` is `NotProcessed`.
    pub cause: Option<NotProcessedCause>,
}

impl ResultRow {
    /// The cause, or `None` when the record was not rejected.
    #[must_use]
    pub fn effective_cause(&self) -> Option<NotProcessedCause> {
        match self.status {
            ResultStatus::NotProcessed => self.cause,
            _ => None,
        }
    }
}

/// Facility whose stale-pending backlog suggests it stopped syncing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFacilitySummaryRow {
    /// District name.
    pub district: String,
    /// Facility lab code.
    pub facility_code: String,
    /// Facility name.
    pub facility_name: String,
    /// Results pending for more than two days.
    pub pending: u64,
    /// Most recent update across all active records of the facility.
    pub last_sync: Option<NaiveDateTime>,
}

/// The four row sets fetched for one tenant in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantData {
    /// Per-facility summary within the interval.
    pub summary: Vec<ResultSummaryRow>,
    /// Raw results within the interval.
    pub results: Vec<ResultRow>,
    /// Cumulative stale-pending results.
    pub stale_pending: Vec<ResultRow>,
    /// Cumulative unsynced-facility summary.
    pub unsynced_facilities: Vec<PendingFacilitySummaryRow>,
}

impl TenantData {
    /// Select the report flow.
    ///
    /// `NoResults` iff both the summary and the stale-pending rows are
    /// empty; raw results and unsynced facilities do not take part.
    #[must_use]
    pub fn flow(&self) -> ReportFlow {
        if self.summary.is_empty() && self.stale_pending.is_empty() {
            ReportFlow::NoResults
        } else {
            ReportFlow::Standard
        }
    }
}
