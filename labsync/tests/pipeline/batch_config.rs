use std::sync::Arc;
use std::time::Duration;

use labsync::{ChannelKind, IntervalMode, IntervalSettings, Labsync, LabsyncError};
use labsync_mock::{DynamicMock, MockBehavior, MockResultsSource, MockTenantDirectory};

use crate::helpers::*;

fn custom(start: &str, end: &str) -> IntervalSettings {
    IntervalSettings {
        report_date_interval: IntervalMode::Custom,
        start_date: Some(start.into()),
        end_date: Some(end.into()),
    }
}

#[tokio::test]
async fn custom_interval_covers_whole_days() {
    let h = harness_with(&["Quiet"], |b, _| b.interval(custom("2024-03-01", "2024-03-10")));

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(
        report.interval.start().to_string(),
        "2024-03-01 00:00:00"
    );
    assert_eq!(
        report.interval.end().to_string(),
        "2024-03-10 23:59:59"
    );
}

#[tokio::test]
async fn malformed_custom_interval_fails_before_enumeration() {
    // A hanging directory would surface as an enumeration timeout if it were consulted.
    let h = harness_with(&["Echo"], |b, mock| {
        b.with_tenant_directory(Arc::clone(&mock.directory))
            .interval(custom("2024-13-01", "2024-03-10"))
            .call_timeout(Duration::from_millis(100))
    });
    h.controller.set_tenants_behavior(MockBehavior::Hang).await;

    let err = h.labsync.run_batch_on(fixture_friday()).await.unwrap_err();
    assert!(matches!(err, LabsyncError::Configuration(_)));
    assert!(err.is_fatal_to_batch());
    assert!(h.controller.submissions().await.is_empty());
}

#[tokio::test]
async fn directory_fault_fails_the_firing() {
    let h = harness_with(&["Echo"], |b, mock| {
        b.with_tenant_directory(Arc::clone(&mock.directory))
    });
    h.controller
        .set_tenants_behavior(MockBehavior::Fail(LabsyncError::Enumeration(
            "partner table unreachable".into(),
        )))
        .await;

    let err = h.labsync.run_batch_on(fixture_friday()).await.unwrap_err();
    assert_eq!(
        err,
        LabsyncError::Enumeration("partner table unreachable".into())
    );
}

#[tokio::test]
async fn directory_timeout_is_an_enumeration_failure() {
    let h = harness_with(&["Echo"], |b, mock| {
        b.with_tenant_directory(Arc::clone(&mock.directory))
            .call_timeout(Duration::from_millis(50))
    });
    h.controller.set_tenants_behavior(MockBehavior::Hang).await;

    let err = h.labsync.run_batch_on(fixture_friday()).await.unwrap_err();
    assert!(matches!(err, LabsyncError::Enumeration(ref m) if m.contains("timed out")));
}

#[tokio::test]
async fn empty_directory_yields_empty_report() {
    let h = harness(&[]);
    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert!(report.outcomes.is_empty());
    assert_eq!(report.delivered(), 0);
}

#[test]
fn builder_requires_directory_and_source() {
    let err = Labsync::builder()
        .with_results_source(Arc::new(MockResultsSource::new()))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, LabsyncError::Configuration(ref m) if m.contains("tenant directory")));

    let err = Labsync::builder()
        .with_tenant_directory(Arc::new(MockTenantDirectory::fixture()))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, LabsyncError::Configuration(ref m) if m.contains("results source")));
}

#[test]
fn gateway_channel_requires_gateway_and_repository() {
    let mock = DynamicMock::new_with_controller();
    let err = Labsync::builder()
        .with_tenant_directory(Arc::new(MockTenantDirectory::fixture()))
        .with_results_source(Arc::new(MockResultsSource::new()))
        .with_gateway(Arc::clone(&mock.gateway))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, LabsyncError::Configuration(_)));
}

#[test]
fn file_system_channel_needs_no_gateway() {
    let labsync = Labsync::builder()
        .with_tenant_directory(Arc::new(MockTenantDirectory::fixture()))
        .with_results_source(Arc::new(MockResultsSource::new()))
        .channel(ChannelKind::FileSystem)
        .build()
        .unwrap();
    assert_eq!(labsync.channel_name(), "file_system");
}

#[test]
fn zero_bounds_are_rejected() {
    let mock = DynamicMock::new_with_controller();
    let base = || {
        Labsync::builder()
            .with_tenant_directory(Arc::clone(&mock.directory))
            .with_results_source(Arc::new(MockResultsSource::new()))
            .with_gateway(Arc::clone(&mock.gateway))
            .with_repository(Arc::clone(&mock.repository))
    };
    assert!(base().max_concurrent_tenants(0).build().is_err());
    assert!(base().call_timeout(Duration::ZERO).build().is_err());
    assert!(base().build().is_ok());
}
