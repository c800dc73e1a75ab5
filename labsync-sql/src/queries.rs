//! SQL text for the four aggregate queries and the tenant directory.
//!
//! Every result query is scoped by facility code and restricted to active
//! records of the tracked result type. Callers must not build a scoped
//! query for an empty code set.

use std::collections::BTreeSet;

use labsync_core::DateInterval;
use sqlx::{MySql, QueryBuilder};

/// Result type the reports track.
pub const TRACKED_RESULT_TYPE: &str = "HIVVL";

/// Minimum age, in days, of a pending record before it counts as stale.
pub const STALE_AFTER_DAYS: i64 = 2;

const DETAIL_COLUMNS: &str = "SELECT RequestId AS request_id, UNIQUEID AS nid, \
     FIRSTNAME AS first_name, SURNAME AS last_name, \
     RequestingDistrictName AS district, RequestingFacilityCode AS facility_code, \
     RequestingFacilityName AS facility_name, CREATED_AT AS created_at, \
     UPDATED_AT AS updated_at, VIRAL_LOAD_STATUS AS status, \
     NOT_PROCESSING_CAUSE AS cause \
     FROM VlData WHERE";

fn push_scope<'a>(qb: &mut QueryBuilder<'a, MySql>, codes: &'a BTreeSet<String>) {
    qb.push(" RequestingFacilityCode IN (");
    let mut list = qb.separated(", ");
    for code in codes {
        list.push_bind(code.as_str());
    }
    list.push_unseparated(")");
    qb.push(" AND ENTITY_STATUS = 'ACTIVE' AND TypeOfResult = ");
    qb.push_bind(TRACKED_RESULT_TYPE);
}

fn push_interval(qb: &mut QueryBuilder<'_, MySql>, interval: &DateInterval) {
    qb.push(" AND CREATED_AT BETWEEN ");
    qb.push_bind(interval.start());
    qb.push(" AND ");
    qb.push_bind(interval.end());
}

fn push_stale_pending(qb: &mut QueryBuilder<'_, MySql>) {
    qb.push(" AND VIRAL_LOAD_STATUS = 'PENDING' AND DATEDIFF(CURRENT_TIMESTAMP, CREATED_AT) > ");
    qb.push_bind(STALE_AFTER_DAYS);
}

fn count_where(condition: &str, alias: &str) -> String {
    format!("CAST(COALESCE(SUM(CASE WHEN {condition} THEN 1 END), 0) AS SIGNED) AS {alias}")
}

fn cause_count(cause: &str, alias: &str) -> String {
    count_where(
        &format!("VIRAL_LOAD_STATUS = 'NOT_PROCESSED' AND NOT_PROCESSING_CAUSE = '{cause}'"),
        alias,
    )
}

/// Per-facility counts within the interval.
pub fn summary_by_facility<'a>(
    interval: &DateInterval,
    codes: &'a BTreeSet<String>,
) -> QueryBuilder<'a, MySql> {
    let columns = [
        count_where("VIRAL_LOAD_STATUS = 'PROCESSED'", "processed"),
        count_where("VIRAL_LOAD_STATUS = 'PENDING'", "pending"),
        cause_count("NID_NOT_FOUND", "nid_not_found"),
        cause_count("INVALID_RESULT", "invalid_result"),
        cause_count("DUPLICATE_NID", "duplicate_nid"),
        cause_count("DUPLICATED_REQUEST_ID", "duplicated_request_id"),
    ]
    .join(", ");
    let mut qb = QueryBuilder::new(format!(
        "SELECT RequestingDistrictName AS district, RequestingFacilityCode AS facility_code, \
         MAX(RequestingFacilityName) AS facility_name, CAST(COUNT(*) AS SIGNED) AS received, \
         {columns} FROM VlData WHERE"
    ));
    push_scope(&mut qb, codes);
    push_interval(&mut qb, interval);
    qb.push(
        " GROUP BY RequestingDistrictName, RequestingFacilityCode \
         ORDER BY RequestingDistrictName, RequestingFacilityCode",
    );
    qb
}

/// One row per record within the interval.
pub fn raw_results<'a>(
    interval: &DateInterval,
    codes: &'a BTreeSet<String>,
) -> QueryBuilder<'a, MySql> {
    let mut qb = QueryBuilder::new(DETAIL_COLUMNS);
    push_scope(&mut qb, codes);
    push_interval(&mut qb, interval);
    qb.push(" ORDER BY CREATED_AT, RequestId");
    qb
}

/// Pending records older than [`STALE_AFTER_DAYS`], cumulative.
pub fn stale_pending(codes: &BTreeSet<String>) -> QueryBuilder<'_, MySql> {
    let mut qb = QueryBuilder::new(DETAIL_COLUMNS);
    push_scope(&mut qb, codes);
    push_stale_pending(&mut qb);
    qb.push(" ORDER BY CREATED_AT, RequestId");
    qb
}

/// Stale-pending counts per facility joined with the facility's latest update.
pub fn unsynced_facility_summary(codes: &BTreeSet<String>) -> QueryBuilder<'_, MySql> {
    let mut qb = QueryBuilder::new(
        "SELECT pending.district, pending.facility_code, pending.facility_name, \
         pending.pending, last_sync.last_sync FROM \
         (SELECT RequestingDistrictName AS district, RequestingFacilityCode AS facility_code, \
         MAX(RequestingFacilityName) AS facility_name, CAST(COUNT(*) AS SIGNED) AS pending \
         FROM VlData WHERE",
    );
    push_scope(&mut qb, codes);
    push_stale_pending(&mut qb);
    qb.push(
        " GROUP BY RequestingDistrictName, RequestingFacilityCode) pending \
         LEFT JOIN (SELECT RequestingDistrictName AS district, \
         RequestingFacilityCode AS facility_code, MAX(UPDATED_AT) AS last_sync \
         FROM VlData WHERE",
    );
    push_scope(&mut qb, codes);
    qb.push(
        " GROUP BY RequestingDistrictName, RequestingFacilityCode) last_sync \
         ON pending.facility_code = last_sync.facility_code \
         AND pending.district = last_sync.district \
         ORDER BY pending.district, pending.facility_code",
    );
    qb
}

/// Implementing partners eligible for reporting.
pub const REPORTABLE_PARTNERS: &str = "SELECT CAST(id AS SIGNED) AS id, org_name, mail_list, \
     repo_id, repo_link, CAST(enabled AS SIGNED) AS enabled FROM ImplementingPartner \
     WHERE enabled = 1 AND repo_link IS NOT NULL AND repo_id IS NOT NULL";

/// Facility codes owned by the given partners.
pub fn org_units(partner_ids: &[i64]) -> QueryBuilder<'_, MySql> {
    let mut qb = QueryBuilder::new(
        "SELECT CAST(implementing_partner_id AS SIGNED) AS implementing_partner_id, code \
         FROM OrgUnit WHERE implementing_partner_id IN (",
    );
    let mut list = qb.separated(", ");
    for id in partner_ids {
        list.push_bind(*id);
    }
    list.push_unseparated(")");
    qb
}
