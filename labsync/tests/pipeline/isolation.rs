use std::time::Duration;

use labsync::{LabsyncError, ReportFlow, Stage};
use labsync_mock::MockBehavior;

use crate::helpers::*;

#[tokio::test]
async fn transport_fault_on_one_tenant_does_not_stop_siblings() {
    let h = harness(&["Echo", "Ariel", "Quiet"]);
    h.controller
        .set_submit_behavior(
            ARIEL_LINK,
            MockBehavior::Fail(LabsyncError::dispatch(None, "connection reset by peer")),
        )
        .await;

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.delivered(), 2);
    assert_eq!(report.failed(), 1);
    assert!(report.outcome("Echo").unwrap().is_delivered());
    assert!(report.outcome("Quiet").unwrap().is_delivered());

    let ariel = report.outcome("Ariel").unwrap();
    let err = ariel.error().unwrap();
    assert!(err.is_dispatch());
    assert!(matches!(err, LabsyncError::Dispatch { status: None, .. }));
    assert_eq!(ariel.flow, Some(ReportFlow::Standard));

    // sequential baseline keeps directory order
    let links: Vec<String> = h
        .controller
        .submissions()
        .await
        .into_iter()
        .map(|s| s.notification.repo_link)
        .collect();
    assert_eq!(links, vec![ECHO_LINK, ARIEL_LINK, QUIET_LINK]);
}

#[tokio::test]
async fn gateway_rejection_keeps_status_code() {
    let h = harness(&["Echo"]);
    h.controller
        .set_submit_behavior(
            ECHO_LINK,
            MockBehavior::Fail(LabsyncError::dispatch(Some(503), "unavailable")),
        )
        .await;

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    let err = report.outcome("Echo").unwrap().error().unwrap().clone();
    assert_eq!(err, LabsyncError::dispatch(Some(503), "unavailable"));
    assert_eq!(err.stage(), Stage::Submit);
}

#[tokio::test]
async fn aggregation_fault_is_never_reported_as_no_results() {
    let h = harness(&["Broken", "Quiet"]);

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();

    let broken = report.outcome("Broken").unwrap();
    assert!(broken.error().unwrap().is_aggregation());
    assert_eq!(broken.flow, None);

    let quiet = report.outcome("Quiet").unwrap();
    assert!(quiet.is_delivered());
    assert_eq!(quiet.flow, Some(ReportFlow::NoResults));

    let submissions = h.controller.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].notification.repo_link, QUIET_LINK);
    assert!(
        submissions
            .iter()
            .all(|s| s.notification.repo_link != BROKEN_LINK)
    );
    assert!(h.controller.uploads().await.is_empty());
}

#[tokio::test]
async fn slow_queries_time_out_as_aggregation_failures() {
    let h = harness_with(&["Slow", "Echo"], |b, _| {
        b.call_timeout(Duration::from_millis(50))
    });

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();

    let err = report.outcome("Slow").unwrap().error().unwrap();
    assert!(matches!(err, LabsyncError::Timeout { timeout_ms: 50, .. }));
    assert!(err.is_aggregation());
    assert!(report.outcome("Echo").unwrap().is_delivered());
}

#[tokio::test]
async fn hanging_gateway_times_out_and_batch_continues() {
    let h = harness_with(&["Echo", "Quiet"], |b, _| {
        b.call_timeout(Duration::from_millis(100))
    });
    h.controller
        .set_submit_behavior(ECHO_LINK, MockBehavior::Hang)
        .await;

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();

    let err = report.outcome("Echo").unwrap().error().unwrap();
    assert_eq!(err.stage(), Stage::Submit);
    assert!(err.is_dispatch());
    assert!(report.outcome("Quiet").unwrap().is_delivered());
    assert!(h.temp_is_empty());
}
