//! Integration tests for document upload, download, and sharing.

mod helpers;

use http::StatusCode;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde_json::json;

#[tokio::test]
async fn test_upload_and_download() {
    let app = helpers::TestApp::new().await;

    let response = app.upload("resume.pdf", "application/pdf", b"%PDF-1.7 body").await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let id = response.data()["id"].as_str().unwrap().to_string();
    assert_eq!(response.data()["fileName"], "resume.pdf");
    assert_eq!(response.data()["sizeBytes"], 13);

    let response = app
        .request("GET", &format!("/api/documents/{id}/download"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[CONTENT_TYPE], "application/pdf");
    assert!(
        response.headers[CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("resume.pdf")
    );
    assert_eq!(response.raw, b"%PDF-1.7 body");

    let response = app
        .request("GET", &format!("/api/documents/{id}/url"), None, None)
        .await;
    assert_eq!(
        response.data()["url"],
        format!("/api/documents/{id}/download")
    );
}

#[tokio::test]
async fn test_upload_requires_file() {
    let app = helpers::TestApp::new().await;
    let response = app.upload("", "text/plain", b"").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_too_large() {
    let app = helpers::TestApp::new().await;
    let data = vec![b'x'; 64 * 1024 + 1];
    let response = app.upload("big.bin", "application/octet-stream", &data).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_document() {
    let app = helpers::TestApp::new().await;
    let response = app.upload("a.txt", "text/plain", b"hello").await;
    let id = response.data()["id"].as_str().unwrap().to_string();

    let response = app
        .request("DELETE", &format!("/api/documents/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/documents/{id}/download"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shared_document() {
    let app = helpers::TestApp::new().await;
    let response = app.upload("cv.pdf", "application/pdf", b"%PDF").await;
    let id = response.data()["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({
                "noteId": id,
                "resourceType": "document",
                "expiresInHours": 1,
                "viewLimit": 2,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let token = response.data()["link"]["token"].as_str().unwrap().to_string();

    let response = app.request("GET", &format!("/api/shares/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["type"], "document");
    assert_eq!(
        response.data()["url"],
        format!("/api/documents/{id}/download")
    );

    let response = app
        .request("POST", &format!("/api/shares/{token}/consume"), None, None)
        .await;
    assert_eq!(response.data()["remainingViews"], 0);

    let response = app.request("GET", &format!("/api/shares/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
