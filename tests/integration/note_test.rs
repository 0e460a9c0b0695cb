//! Integration tests for notes, site content, and health.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_note_crud() {
    let app = helpers::TestApp::new().await;
    let id = app.create_note("Groceries", "- eggs").await;

    let response = app.request("GET", &format!("/api/notes/{id}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["title"], "Groceries");
    assert!(response.data()["createdAt"].is_string());

    let response = app
        .request(
            "PUT",
            &format!("/api/notes/{id}"),
            Some(json!({ "content": "- eggs\n- milk", "tags": ["home"] })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["title"], "Groceries");
    assert_eq!(response.data()["tags"], json!(["home"]));

    let response = app.request("GET", "/api/notes", None, None).await;
    assert_eq!(response.data().as_array().map(Vec::len), Some(1));

    let response = app.request("DELETE", &format!("/api/notes/{id}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", &format!("/api/notes/{id}"), None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_note_validation() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/api/notes", Some(json!({ "title": "" })), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");

    let response = app
        .request("POST", "/api/notes", Some(json!({ "content": "no title" })), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_notifications() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/notifications",
            Some(json!({ "title": "Deploy", "message": "v2 is live" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.data()["id"].as_str().unwrap().to_string();
    assert_eq!(response.data()["read"], false);

    let response = app
        .request("PUT", &format!("/api/notifications/{id}/read"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["read"], true);

    let response = app
        .request("DELETE", &format!("/api/notifications/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("PUT", &format!("/api/notifications/{id}/read"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_config_and_commands() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/config/theme", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "PUT",
            "/api/config/theme",
            Some(json!({ "value": { "accent": "teal" } })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/config/theme", None, None).await;
    assert_eq!(response.data(), &json!({ "accent": "teal" }));

    let response = app.request("GET", "/api/commands/metadata", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data().is_null());

    let response = app
        .request(
            "PUT",
            "/api/commands/metadata",
            Some(json!({ "payload": { "command": "confetti" } })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/commands/metadata", None, None).await;
    assert_eq!(response.data()["payload"]["command"], "confetti");
}

#[tokio::test]
async fn test_stories() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/stories",
            Some(json!({ "title": "Why Rust", "story": "Because." })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.request("GET", "/api/stories", None, None).await;
    assert_eq!(response.data()[0]["title"], "Why Rust");
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"]["provider"], "memory");
    assert_eq!(response.data()["storage"]["healthy"], true);
}
