//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use notenest_api::AppState;
use notenest_core::config::AppConfig;
use notenest_core::traits::store::DocumentStore;
use notenest_database::MemoryDocumentStore;
use notenest_storage::LocalStorageProvider;

/// Multipart boundary used by [`TestApp::upload`].
const BOUNDARY: &str = "notenest-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Document store behind the app, for direct inspection
    pub store: Arc<dyn DocumentStore>,
    /// Application state
    pub state: AppState,
    /// Keeps the storage root alive for the test's duration
    _storage_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a test application on an in-memory store and a temp storage root
    pub async fn new() -> Self {
        Self::with_config(Self::test_config()).await
    }

    /// The configuration every test starts from
    pub fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.worker.enabled = false;
        config.share.base_url = "https://notes.test".to_string();
        config.share.cleanup_delay_seconds = 0;
        config.storage.max_upload_size_bytes = 64 * 1024;
        config
    }

    /// Create a test application with a custom configuration
    pub async fn with_config(config: AppConfig) -> Self {
        let storage_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = Arc::new(
            LocalStorageProvider::new(storage_dir.path())
                .await
                .expect("Failed to init storage"),
        );
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::default());

        let state = notenest_api::build_state(config, Arc::clone(&store), storage)
            .expect("Failed to build state");
        let router = notenest_api::build_app(state.clone());

        Self {
            router,
            store,
            state,
            _storage_dir: storage_dir,
        }
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json");

        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a file through the multipart endpoint
    pub async fn upload(&self, file_name: &str, content_type: &str, data: &[u8]) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/documents")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw: body_bytes.to_vec(),
        }
    }

    /// Create a note and return its ID
    pub async fn create_note(&self, title: &str, content: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/notes",
                Some(serde_json::json!({ "title": title, "content": content })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data()["id"]
            .as_str()
            .expect("No id in note response")
            .to_string()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body (`Null` when the body is not JSON)
    pub body: Value,
    /// Raw body bytes
    pub raw: Vec<u8>,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// All `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// The `Set-Cookie` value for one cookie name
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookies()
            .into_iter()
            .find(|c| c.starts_with(&format!("{name}=")))
    }
}
