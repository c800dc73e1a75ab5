use std::time::Duration;

use labsync::{LabsyncError, Stage};
use labsync_mock::MockBehavior;

use crate::helpers::*;

#[tokio::test]
async fn artifact_is_removed_after_successful_dispatch() {
    let h = harness(&["Echo", "Ariel"]);

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(report.delivered(), 2);

    let submissions = h.controller.submissions().await;
    assert_eq!(submissions.len(), 2);
    for s in &submissions {
        assert!(s.attachment_existed, "artifact must exist while submitting");
        let path = &s.notification.attachment.as_ref().unwrap().path;
        assert!(path.starts_with(h.temp.path()));
        assert!(!path.exists());
    }
    assert!(h.temp_is_empty());
}

#[tokio::test]
async fn artifact_is_removed_after_failed_dispatch() {
    let h = harness(&["Echo"]);
    h.controller
        .set_submit_behavior(
            ECHO_LINK,
            MockBehavior::Fail(LabsyncError::dispatch(Some(500), "boom")),
        )
        .await;

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(report.failed(), 1);

    let submissions = h.controller.submissions().await;
    let path = &submissions[0].notification.attachment.as_ref().unwrap().path;
    assert!(submissions[0].attachment_existed);
    assert!(!path.exists());
    assert!(h.temp_is_empty());
}

#[tokio::test]
async fn upload_failure_is_a_warning_and_dispatch_proceeds() {
    let h = harness(&["Echo"]);
    h.controller
        .set_upload_behavior(
            "repo-echo",
            MockBehavior::Fail(LabsyncError::storage_upload("repo-echo", "quota exceeded")),
        )
        .await;

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    let echo = report.outcome("Echo").unwrap();
    assert!(echo.is_delivered());
    assert_eq!(
        echo.warnings,
        vec![LabsyncError::storage_upload("repo-echo", "quota exceeded")]
    );

    let submissions = h.controller.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert!(submissions[0].attachment_existed);
    assert!(h.temp_is_empty());
}

#[tokio::test]
async fn hanging_upload_times_out_without_blocking_submission() {
    let h = harness_with(&["Echo"], |b, _| b.call_timeout(Duration::from_millis(100)));
    h.controller
        .set_upload_behavior("repo-echo", MockBehavior::Hang)
        .await;

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    let echo = report.outcome("Echo").unwrap();
    assert!(echo.is_delivered());
    assert_eq!(echo.warnings.len(), 1);
    assert_eq!(echo.warnings[0].stage(), Stage::Upload);
    assert_eq!(h.controller.submissions().await.len(), 1);
    assert!(h.temp_is_empty());
}

#[tokio::test]
async fn upload_receives_the_same_file_that_is_submitted() {
    let h = harness(&["Echo"]);

    h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    let uploads = h.controller.uploads().await;
    let submissions = h.controller.submissions().await;
    assert_eq!(
        uploads[0].path,
        submissions[0].notification.attachment.as_ref().unwrap().path
    );
    assert!(uploads[0].path.ends_with(ECHO_ATTACHMENT));
}
