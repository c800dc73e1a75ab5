use std::sync::Arc;

use labsync::{ChannelKind, Labsync, ReportFlow};
use labsync_core::TenantRecord;
use labsync_mock::{MockResultsSource, MockTenantDirectory};

use crate::helpers::*;

#[tokio::test]
async fn workbook_is_written_per_tenant_and_nothing_is_sent() {
    let out = tempfile::tempdir().unwrap();
    let out_path = out.path().to_path_buf();
    let h = harness_with(&["Echo", "Quiet"], move |b, _| {
        b.channel(ChannelKind::FileSystem).output_dir(out_path)
    });

    let report = h.labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(report.delivered(), 2);
    assert_eq!(
        report.outcome("Quiet").unwrap().flow,
        Some(ReportFlow::NoResults)
    );

    let file = out
        .path()
        .join("ECHO")
        .join("viral_Result_from_01-01-2023_To_07-01-2023.xlsx");
    assert_eq!(report.outcome("Echo").unwrap().saved_to.as_deref(), Some(file.as_path()));
    assert!(report.outcome("Quiet").unwrap().saved_to.is_none());
    let bytes = std::fs::read(&file).unwrap();
    assert!(bytes.starts_with(b"PK"), "xlsx is a zip container");
    assert!(!out.path().join("QUIET").exists());

    assert!(h.controller.submissions().await.is_empty());
    assert!(h.controller.uploads().await.is_empty());
}

#[tokio::test]
async fn tenant_directory_stays_inside_output_dir() {
    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("out");
    let records = ["../escape", "/abs"]
        .into_iter()
        .map(|name| TenantRecord {
            name: name.to_string(),
            facility_codes: vec!["MPT01".to_string()],
            mail_list: Some("ops@example.org".into()),
            repo_id: Some("repo".into()),
            repo_link: Some("https://files.example.org/d/x".into()),
            enabled: true,
        })
        .collect();
    let labsync = Labsync::builder()
        .with_tenant_directory(Arc::new(MockTenantDirectory::with_records(records)))
        .with_results_source(Arc::new(MockResultsSource::new()))
        .channel(ChannelKind::FileSystem)
        .output_dir(out.clone())
        .build()
        .unwrap();

    let report = labsync.run_batch_on(fixture_friday()).await.unwrap();
    assert_eq!(report.delivered(), 2);
    for (tenant, dir) in [("../escape", "___ESCAPE"), ("/abs", "_ABS")] {
        let saved = report.outcome(tenant).unwrap().saved_to.clone().unwrap();
        assert_eq!(saved.parent().unwrap(), out.join(dir));
        assert!(saved.exists());
    }
    let mut entries: Vec<_> = std::fs::read_dir(root.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    entries.sort();
    assert_eq!(entries, vec![std::ffi::OsString::from("out")]);
}
