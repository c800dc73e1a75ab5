use chrono::{NaiveDate, NaiveDateTime};
use labsync_core::{NotProcessedCause, ResultRow, ResultStatus};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(h, 0, 0))
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn row(
    request_id: &str,
    district: &str,
    code: &str,
    facility: &str,
    created_at: NaiveDateTime,
    updated_at: Option<NaiveDateTime>,
    status: ResultStatus,
    cause: Option<NotProcessedCause>,
) -> ResultRow {
    ResultRow {
        request_id: request_id.to_string(),
        nid: format!("0111{}/{}", &code[..3], &request_id[request_id.len() - 3..]),
        first_name: Some("Paciente".to_string()),
        last_name: Some(request_id.to_string()),
        district: district.to_string(),
        facility_code: code.to_string(),
        facility_name: facility.to_string(),
        created_at,
        updated_at,
        status,
        cause,
    }
}

/// Every fixture record for a facility code, regardless of date or status.
pub fn by_facility(code: &str) -> Vec<ResultRow> {
    use NotProcessedCause::{InvalidResult, NidNotFound};
    use ResultStatus::{NotProcessed, Pending, Processed};
    match code {
        "MPT01" => {
            let (d, f) = ("Maputo", "CS Polana");
            vec![
                row("REQ-MPT01-001", d, code, f, at(2023, 1, 2, 8), Some(at(2023, 1, 3, 9)), Processed, None),
                row("REQ-MPT01-002", d, code, f, at(2023, 1, 3, 10), Some(at(2023, 1, 4, 7)), Processed, None),
                row("REQ-MPT01-003", d, code, f, at(2023, 1, 4, 11), Some(at(2023, 1, 4, 15)), NotProcessed, Some(NidNotFound)),
                row("REQ-MPT01-004", d, code, f, at(2023, 1, 5, 12), None, Pending, None),
                row("REQ-MPT01-005", d, code, f, at(2022, 12, 20, 9), Some(at(2022, 12, 21, 9)), Processed, None),
            ]
        }
        "MPT02" => {
            let (d, f) = ("Maputo", "CS Malhangalene");
            vec![
                row("REQ-MPT02-001", d, code, f, at(2023, 1, 6, 8), Some(at(2023, 1, 6, 18)), NotProcessed, Some(InvalidResult)),
                row("REQ-MPT02-002", d, code, f, at(2023, 1, 7, 23), Some(at(2023, 1, 8, 6)), Processed, None),
            ]
        }
        "BEI01" => vec![row(
            "REQ-BEI01-001",
            "Beira",
            code,
            "HC Beira",
            at(2022, 11, 15, 9),
            None,
            Pending,
            None,
        )],
        _ => vec![],
    }
}
