use std::sync::Arc;
use std::time::Duration;

use labsync::{Labsync, ReportFlow};
use labsync_core::TenantRecord;
use labsync_mock::{DynamicMock, MockResultsSource, MockTenantDirectory};

use crate::helpers::*;

#[tokio::test]
async fn tenant_with_results_gets_workbook_and_summary() {
    let h = harness(&["Echo"]);

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    let echo = report.outcome("Echo").unwrap();
    assert!(echo.is_delivered());
    assert_eq!(echo.flow, Some(ReportFlow::Standard));
    assert!(echo.warnings.is_empty());

    let submissions = h.controller.submissions().await;
    assert_eq!(submissions.len(), 1);
    let sent = &submissions[0];
    let n = &sent.notification;
    assert!(n.has_results);
    assert_eq!(n.start_date, "01-01-2023");
    assert_eq!(n.end_date, "07-01-2023");
    assert_eq!(n.recipients, vec!["echo@example.org", "m&e-echo@example.org"]);
    assert_eq!(n.module, "notification");
    assert_eq!(
        n.subject,
        "Relatório de Sincronização de resultados lab de 01-01-2023 a 07-01-2023"
    );
    assert!(n.html_body.contains("MPT01"));
    assert_eq!(n.attachment.as_ref().unwrap().name, ECHO_ATTACHMENT);
    assert!(sent.attachment_existed);
    assert!(sent.attachment_len.unwrap() > 0);

    let uploads = h.controller.uploads().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].repo_id, "repo-echo");
    assert!(uploads[0].existed);
}

#[tokio::test]
async fn empty_tenant_gets_no_results_notice_without_attachment() {
    let h = harness(&["Quiet"]);

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(
        report.outcome("Quiet").unwrap().flow,
        Some(ReportFlow::NoResults)
    );

    let submissions = h.controller.submissions().await;
    assert_eq!(submissions.len(), 1);
    let n = &submissions[0].notification;
    assert!(!n.has_results);
    assert!(n.attachment.is_none());
    assert_eq!(n.repo_link, QUIET_LINK);
    assert!(h.controller.uploads().await.is_empty());
}

#[tokio::test]
async fn stale_pending_alone_selects_standard_flow() {
    // Ariel has nothing inside the week but an old pending result
    let h = harness(&["Ariel"]);

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(
        report.outcome("Ariel").unwrap().flow,
        Some(ReportFlow::Standard)
    );
    let submissions = h.controller.submissions().await;
    assert!(submissions[0].notification.has_results);
    assert!(submissions[0].notification.attachment.is_some());
}

#[tokio::test]
async fn ineligible_tenants_are_not_attempted() {
    let h = harness(&["Dormant", "Unlinked", "Quiet"]);

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(report.outcomes.len(), 1);
    assert!(report.outcome("Dormant").is_none());
    assert!(report.outcome("Unlinked").is_none());
}

#[tokio::test]
async fn every_tenant_shares_the_batch_interval() {
    let h = harness(&["Echo", "Quiet"]);

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(report.interval.formatted_start(), "01-01-2023");
    assert_eq!(report.interval.formatted_end(), "07-01-2023");
    for s in h.controller.submissions().await {
        assert_eq!(s.notification.start_date, "01-01-2023");
        assert_eq!(s.notification.end_date, "07-01-2023");
    }
}

#[tokio::test]
async fn slash_in_tenant_name_does_not_break_the_attachment_path() {
    let mock = DynamicMock::new_with_controller();
    let temp = tempfile::tempdir().unwrap();
    let record = TenantRecord {
        name: "FGH/Echo".into(),
        facility_codes: vec!["MPT01".into(), "MPT02".into()],
        mail_list: Some("fgh@example.org".into()),
        repo_id: Some("repo-fgh".into()),
        repo_link: Some(ECHO_LINK.into()),
        enabled: true,
    };
    let labsync = Labsync::builder()
        .with_tenant_directory(Arc::new(MockTenantDirectory::with_records(vec![record])))
        .with_results_source(Arc::new(MockResultsSource::new()))
        .with_gateway(Arc::clone(&mock.gateway))
        .with_repository(Arc::clone(&mock.repository))
        .call_timeout(Duration::from_secs(2))
        .temp_dir(temp.path())
        .build()
        .unwrap();

    let report = labsync.run_batch_on(fixture_friday()).await.unwrap();
    let outcome = report.outcome("FGH/Echo").unwrap();
    assert!(outcome.is_delivered(), "{:?}", outcome.status);

    let submissions = mock.controller.submissions().await;
    assert_eq!(submissions.len(), 1);
    let attachment = submissions[0].notification.attachment.as_ref().unwrap();
    assert_eq!(
        attachment.name,
        "CSaude_Resultados_SI-SESP_FGH_ECHO_01-01-2023_a_07-01-2023.xlsx"
    );
    assert!(submissions[0].attachment_existed);
    assert_eq!(mock.controller.uploads().await[0].repo_id, "repo-fgh");
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}
