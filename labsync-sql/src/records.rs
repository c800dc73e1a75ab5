use chrono::NaiveDateTime;
use labsync_core::{
    CauseCounts, LabsyncError, PendingFacilitySummaryRow, ResultRow, ResultStatus,
    ResultSummaryRow, Stage,
};
use sqlx::FromRow;

fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

#[derive(Debug, FromRow)]
pub(crate) struct SummaryRecord {
    district: Option<String>,
    facility_code: String,
    facility_name: Option<String>,
    received: i64,
    processed: i64,
    pending: i64,
    nid_not_found: i64,
    invalid_result: i64,
    duplicate_nid: i64,
    duplicated_request_id: i64,
}

impl From<SummaryRecord> for ResultSummaryRow {
    fn from(r: SummaryRecord) -> Self {
        Self {
            district: r.district.unwrap_or_default(),
            facility_code: r.facility_code,
            facility_name: r.facility_name.unwrap_or_default(),
            received: count(r.received),
            processed: count(r.processed),
            pending: count(r.pending),
            not_processed: CauseCounts {
                nid_not_found: count(r.nid_not_found),
                invalid_result: count(r.invalid_result),
                duplicate_nid: count(r.duplicate_nid),
                duplicated_request_id: count(r.duplicated_request_id),
            },
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct DetailRecord {
    request_id: String,
    nid: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    district: Option<String>,
    facility_code: String,
    facility_name: Option<String>,
    created_at: NaiveDateTime,
    updated_at: Option<NaiveDateTime>,
    status: String,
    cause: Option<String>,
}

impl DetailRecord {
    /// Unknown statuses are data faults; unknown causes are dropped.
    pub(crate) fn into_row(self, stage: Stage) -> Result<ResultRow, LabsyncError> {
        let status: ResultStatus = self
            .status
            .parse()
            .map_err(|e: String| LabsyncError::aggregation(stage, format!("{}: {e}", self.request_id)))?;
        Ok(ResultRow {
            nid: self.nid.unwrap_or_default(),
            first_name: self.first_name,
            last_name: self.last_name,
            district: self.district.unwrap_or_default(),
            facility_code: self.facility_code,
            facility_name: self.facility_name.unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            status,
            cause: self.cause.as_deref().and_then(|c| c.parse().ok()),
            request_id: self.request_id,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct UnsyncedRecord {
    district: Option<String>,
    facility_code: String,
    facility_name: Option<String>,
    pending: i64,
    last_sync: Option<NaiveDateTime>,
}

impl From<UnsyncedRecord> for PendingFacilitySummaryRow {
    fn from(r: UnsyncedRecord) -> Self {
        Self {
            district: r.district.unwrap_or_default(),
            facility_code: r.facility_code,
            facility_name: r.facility_name.unwrap_or_default(),
            pending: count(r.pending),
            last_sync: r.last_sync,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PartnerRecord {
    pub(crate) id: i64,
    pub(crate) org_name: String,
    pub(crate) mail_list: Option<String>,
    pub(crate) repo_id: Option<String>,
    pub(crate) repo_link: Option<String>,
    pub(crate) enabled: i64,
}

#[derive(Debug, FromRow)]
pub(crate) struct OrgUnitRecord {
    pub(crate) implementing_partner_id: i64,
    pub(crate) code: String,
}
