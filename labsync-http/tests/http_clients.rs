use std::time::Duration;

use httpmock::prelude::*;
use labsync_core::connector::{DocumentRepository, NotificationGateway};
use labsync_core::{ArtifactRef, LabsyncError, Notification, Stage};
use labsync_http::{GatewayClient, SeafileClient, http_client};
use url::Url;

fn http() -> reqwest::Client {
    http_client(Duration::from_secs(2)).unwrap()
}

fn notification(attachment: Option<ArtifactRef>) -> Notification {
    Notification {
        recipients: vec!["echo@example.org".into()],
        subject: "Relatório de Sincronização de resultados lab de 01-01-2023 a 07-01-2023".into(),
        html_body: "<p>ok</p>".into(),
        module: "notification".into(),
        has_results: attachment.is_some(),
        attachment,
        start_date: "01-01-2023".into(),
        end_date: "07-01-2023".into(),
        repo_link: "https://files.example.org/d/echo".into(),
    }
}

#[tokio::test]
async fn gateway_accepts_any_2xx() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST).path("/notify");
            then.status(202).body("accepted");
        })
        .await;
    let gw = GatewayClient::new(http(), Url::parse(&server.url("/notify")).unwrap());
    let receipt = gw.submit(&notification(None)).await.unwrap();
    m.assert_async().await;
    assert_eq!(receipt.status, 202);
    assert_eq!(receipt.body, "accepted");
}

#[tokio::test]
async fn gateway_posts_the_attachment_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("R_ECHO.xlsx");
    tokio::fs::write(&path, b"PK\x03\x04 workbook").await.unwrap();
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST).path("/notify");
            then.status(200).body("ok");
        })
        .await;
    let gw = GatewayClient::new(http(), Url::parse(&server.url("/notify")).unwrap());
    let art = ArtifactRef {
        name: "R_ECHO.xlsx".into(),
        path,
    };
    gw.submit(&notification(Some(art))).await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn gateway_non_success_is_a_dispatch_error_with_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/notify");
            then.status(503).body("maintenance");
        })
        .await;
    let gw = GatewayClient::new(http(), Url::parse(&server.url("/notify")).unwrap());
    let err = gw.submit(&notification(None)).await.unwrap_err();
    assert!(err.is_dispatch());
    assert!(matches!(err, LabsyncError::Dispatch { status: Some(503), .. }));
}

#[tokio::test]
async fn gateway_transport_fault_is_a_dispatch_error_without_status() {
    let gw = GatewayClient::new(http(), Url::parse("http://127.0.0.1:1/notify").unwrap());
    let err = gw.submit(&notification(None)).await.unwrap_err();
    assert!(matches!(err, LabsyncError::Dispatch { status: None, .. }));
}

#[tokio::test]
async fn gateway_missing_attachment_file_fails_before_sending() {
    let server = MockServer::start_async().await;
    let gw = GatewayClient::new(http(), Url::parse(&server.url("/notify")).unwrap());
    let art = ArtifactRef {
        name: "gone.xlsx".into(),
        path: "/nonexistent/gone.xlsx".into(),
    };
    let err = gw.submit(&notification(Some(art))).await.unwrap_err();
    assert!(err.is_dispatch());
}

#[tokio::test]
async fn seafile_upload_uses_the_returned_link() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("R_ECHO.xlsx");
    tokio::fs::write(&path, b"PK\x03\x04").await.unwrap();

    let server = MockServer::start_async().await;
    let upload_url = server.url("/seafhttp/upload-api/one-shot");
    let link = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api2/repos/repo-echo/upload-link/")
                .query_param("p", "/")
                .header("authorization", "Token s3cret");
            then.status(200).body(format!("\"{upload_url}\""));
        })
        .await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/seafhttp/upload-api/one-shot")
                .header("authorization", "Token s3cret");
            then.status(200).body("R_ECHO.xlsx");
        })
        .await;

    let sf = SeafileClient::new(http(), Url::parse(&server.base_url()).unwrap(), "s3cret");
    let receipt = sf.upload("repo-echo", &path).await.unwrap();
    link.assert_async().await;
    upload.assert_async().await;
    assert_eq!(receipt.0, "R_ECHO.xlsx");
}

#[tokio::test]
async fn seafile_rejected_link_is_a_storage_upload_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("R.xlsx");
    tokio::fs::write(&path, b"PK").await.unwrap();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api2/repos/repo-x/upload-link/");
            then.status(403).body("{\"detail\":\"Permission denied.\"}");
        })
        .await;
    let sf = SeafileClient::new(http(), Url::parse(&server.base_url()).unwrap(), "t");
    let err = sf.upload("repo-x", &path).await.unwrap_err();
    assert_eq!(err.stage(), Stage::Upload);
    assert!(matches!(err, LabsyncError::StorageUpload { ref repo_id, .. } if repo_id == "repo-x"));
}

#[tokio::test]
async fn seafile_escaped_link_is_decoded_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("R_ECHO.xlsx");
    tokio::fs::write(&path, b"PK\x03\x04").await.unwrap();

    let server = MockServer::start_async().await;
    let escaped = server.url("/upload-api/xyz").replace('/', "\\/");
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api2/repos/repo-echo/upload-link/");
            then.status(200).body(format!("\"{escaped}\""));
        })
        .await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload-api/xyz");
            then.status(200).body("R_ECHO.xlsx");
        })
        .await;

    let sf = SeafileClient::new(http(), Url::parse(&server.base_url()).unwrap(), "t");
    sf.upload("repo-echo", &path).await.unwrap();
    upload.assert_async().await;
}

#[tokio::test]
async fn seafile_non_json_link_is_a_storage_upload_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("R.xlsx");
    tokio::fs::write(&path, b"PK").await.unwrap();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api2/repos/repo-x/upload-link/");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;
    let sf = SeafileClient::new(http(), Url::parse(&server.base_url()).unwrap(), "t");
    let err = sf.upload("repo-x", &path).await.unwrap_err();
    assert!(matches!(err, LabsyncError::StorageUpload { ref msg, .. } if msg.contains("JSON")));
}
