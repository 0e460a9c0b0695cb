//! Integration tests for share link issuance and redemption.

mod helpers;

use std::time::Duration;

use http::StatusCode;
use serde_json::{Value, json};

use notenest_core::traits::store::DocumentStore;
use notenest_entity::collections::SHARED_NOTE_LINKS;

async fn share(app: &helpers::TestApp, note_id: &str, hours: u32, limit: u32) -> Value {
    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({
                "noteId": note_id,
                "expiresInHours": hours,
                "viewLimit": limit,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.data().clone()
}

fn token_of(created: &Value) -> String {
    created["link"]["token"].as_str().unwrap().to_string()
}

fn assert_invalid(response: &helpers::TestResponse) {
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Invalid or expired share link");
}

#[tokio::test]
async fn test_create_share() {
    let app = helpers::TestApp::new().await;
    let note_id = app.create_note("Plan", "secret").await;

    let created = share(&app, &note_id, 24, 1).await;
    let token = token_of(&created);

    assert_eq!(token.len(), 20);
    assert_eq!(created["url"], format!("https://notes.test/share/{token}"));
    assert_eq!(created["link"]["viewCount"], 0);
    assert_eq!(created["link"]["resourceType"], "note");
}

#[tokio::test]
async fn test_single_use_link() {
    let app = helpers::TestApp::new().await;
    let note_id = app.create_note("Plan", "secret").await;
    let token = token_of(&share(&app, &note_id, 24, 1).await);

    let response = app.request("GET", &format!("/api/shares/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["type"], "note");
    assert_eq!(response.data()["note"]["content"], "secret");

    let response = app.request("GET", &format!("/api/shares/{token}"), None, None).await;
    assert_invalid(&response);
}

#[tokio::test]
async fn test_exhausted_link_removed_from_store() {
    let app = helpers::TestApp::new().await;
    let note_id = app.create_note("Plan", "secret").await;
    let token = token_of(&share(&app, &note_id, 24, 1).await);

    app.request("GET", &format!("/api/shares/{token}"), None, None).await;

    let mut gone = false;
    for _ in 0..50 {
        if app.store.get(SHARED_NOTE_LINKS, &token).await.unwrap().is_none() {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(gone, "exhausted link was not deleted");
}

#[tokio::test]
async fn test_unlimited_link() {
    let app = helpers::TestApp::new().await;
    let note_id = app.create_note("Open", "for all").await;
    let token = token_of(&share(&app, &note_id, 0, 0).await);

    for _ in 0..10 {
        let response = app.request("GET", &format!("/api/shares/{token}"), None, None).await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_unknown_token() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/shares/nope", None, None).await;
    assert_invalid(&response);

    let response = app.request("POST", "/api/shares/nope/consume", None, None).await;
    assert_invalid(&response);
}

#[tokio::test]
async fn test_resolve_and_consume_share_counter() {
    let app = helpers::TestApp::new().await;
    let note_id = app.create_note("Pair", "x").await;
    let token = token_of(&share(&app, &note_id, 24, 3).await);

    app.request("GET", &format!("/api/shares/{token}"), None, None).await;
    let response = app
        .request("POST", &format!("/api/shares/{token}/consume"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["viewCount"], 2);
    assert_eq!(response.data()["remainingViews"], 1);
}

#[tokio::test]
async fn test_list_and_revoke() {
    let app = helpers::TestApp::new().await;
    let a = app.create_note("A", "a").await;
    let b = app.create_note("B", "b").await;
    let token = token_of(&share(&app, &a, 1, 0).await);
    share(&app, &b, 1, 0).await;

    let response = app.request("GET", "/api/shares", None, None).await;
    assert_eq!(response.data().as_array().map(Vec::len), Some(2));

    let response = app
        .request("GET", &format!("/api/shares?resourceId={a}"), None, None)
        .await;
    assert_eq!(response.data().as_array().map(Vec::len), Some(1));

    let response = app.request("DELETE", &format!("/api/shares/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", &format!("/api/shares/{token}"), None, None).await;
    assert_invalid(&response);
}

#[tokio::test]
async fn test_deleting_note_revokes_links() {
    let app = helpers::TestApp::new().await;
    let note_id = app.create_note("Temp", "t").await;
    let token = token_of(&share(&app, &note_id, 0, 0).await);

    app.request("DELETE", &format!("/api/notes/{note_id}"), None, None).await;

    let response = app.request("GET", &format!("/api/shares/{token}"), None, None).await;
    assert_invalid(&response);
}

#[tokio::test]
async fn test_share_validation() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({ "noteId": "", "expiresInHours": 1, "viewLimit": 1 })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({ "noteId": "missing", "expiresInHours": 1, "viewLimit": 1 })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({ "noteId": "x", "expiresInHours": -1, "viewLimit": 1 })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
