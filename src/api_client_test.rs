//! Tests for the backend client.
//!
//! Each test starts a throwaway axum backend on an ephemeral port and points
//! an `ApiClient` at it.

use super::*;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode as AxumStatus},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock backend
// ============================================================================

#[derive(Clone, Default)]
struct Recorded {
    auth_headers: Arc<Mutex<Vec<Option<String>>>>,
    bodies: Arc<Mutex<Vec<serde_json::Value>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Recorded {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().unwrap().push(value);
    }
}

async fn mock_get_note(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> axum::response::Response {
    rec.record_auth(&headers);
    match slug.as_str() {
        "expired" => AxumStatus::UNAUTHORIZED.into_response(),
        "missing" => (
            AxumStatus::NOT_FOUND,
            Json(json!({"code": 404, "message": "note not found"})),
        )
            .into_response(),
        "blank" => AxumStatus::OK.into_response(),
        "null" => Json(serde_json::Value::Null).into_response(),
        other => Json(json!({
            "slug": other,
            "contentMd": format!("# {}", other),
            "title": other,
            "isLocked": 0,
            "uv": 3
        }))
        .into_response(),
    }
}

async fn mock_save(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    rec.record_auth(&headers);
    rec.bodies.lock().unwrap().push(body.clone());
    if body["slug"] == "readonly" {
        return (AxumStatus::FORBIDDEN, "plain text error").into_response();
    }
    Json(json!({"ok": true})).into_response()
}

async fn mock_search(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> axum::response::Response {
    rec.record_auth(&headers);
    rec.queries.lock().unwrap().push(q.clone());
    Json(json!([
        {
            "slug": "abc1234",
            "innerSlug": "pub-abc",
            "contentMd": "one\ntwo",
            "title": "First",
            "similarity": 0.5,
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-02-01T00:00:00Z"
        }
    ]))
    .into_response()
}

async fn mock_login(Json(body): Json<serde_json::Value>) -> axum::response::Response {
    if body["username"] == "locked" {
        return (
            AxumStatus::UNAUTHORIZED,
            Json(json!({"code": 401, "message": "Account locked"})),
        )
            .into_response();
    }
    if body["password"] == "secret" {
        Json(json!({"token": "tok-123"})).into_response()
    } else {
        (
            AxumStatus::BAD_REQUEST,
            Json(json!({"code": 1, "message": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn mock_google(Json(body): Json<serde_json::Value>) -> axum::response::Response {
    if body["code"] == "good" && body["redirectUri"] == "https://app/cb" {
        Json(json!({"token": "g-tok"})).into_response()
    } else {
        Json(json!({})).into_response()
    }
}

async fn mock_uptoken(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> axum::response::Response {
    rec.record_auth(&headers);
    rec.queries.lock().unwrap().push(q.clone());
    Json(json!({"uptoken": format!("signed:{}", q.get("key").cloned().unwrap_or_default())}))
        .into_response()
}

async fn spawn_backend() -> (ApiClient, Recorded) {
    let rec = Recorded::default();
    let app = Router::new()
        .route("/mgr/note/{slug}", get(mock_get_note))
        .route("/public/note/{slug}", get(mock_get_note))
        .route("/api/note/save", post(mock_save))
        .route("/api/note/delete", post(mock_save))
        .route("/api/note/share", post(mock_save))
        .route("/api/note/search", get(mock_search))
        .route("/public/login", post(mock_login))
        .route("/public/login-google-oauth2", post(mock_google))
        .route("/api/qiniu/uptoken", get(mock_uptoken))
        .with_state(rec.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = Url::parse(&format!("http://{}", addr)).unwrap();
    (ApiClient::new(base).unwrap(), rec)
}

// ============================================================================
// Interceptors
// ============================================================================

#[tokio::test]
async fn test_bearer_attached_only_with_token() {
    let (client, rec) = spawn_backend().await;

    client.get_note("abc", Some("tok-1")).await.unwrap();
    client.get_note("abc", None).await.unwrap();
    client.get_note("abc", Some("")).await.unwrap();

    let headers = rec.auth_headers.lock().unwrap().clone();
    assert_eq!(
        headers,
        vec![Some("Bearer tok-1".to_string()), None, None]
    );
}

#[tokio::test]
async fn test_401_maps_to_unauthorized() {
    let (client, _) = spawn_backend().await;
    let err = client.get_note("expired", Some("old")).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_error_status_carries_backend_message() {
    let (client, _) = spawn_backend().await;
    let err = client.get_note("missing", None).await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message.as_deref(), Some("note not found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_error_body_has_no_message() {
    let (client, _) = spawn_backend().await;
    let req = SaveNoteRequest::new("readonly", "text");
    let err = client.save_note(&req, Some("t")).await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert!(message.is_none());
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

// ============================================================================
// Notes
// ============================================================================

#[tokio::test]
async fn test_get_note_decodes_record() {
    let (client, _) = spawn_backend().await;
    let note = client.get_note("abc1234", None).await.unwrap().unwrap();
    assert_eq!(note.slug, "abc1234");
    assert_eq!(note.content_md, "# abc1234");
    assert_eq!(note.uv, 3);
}

#[tokio::test]
async fn test_get_note_empty_or_null_body_is_none() {
    let (client, _) = spawn_backend().await;
    assert!(client.get_note("blank", None).await.unwrap().is_none());
    assert!(client.get_note("null", None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_slug_is_encoded_as_one_segment() {
    let (client, _) = spawn_backend().await;
    let note = client.get_note("a b/c", None).await.unwrap().unwrap();
    assert_eq!(note.slug, "a b/c");
}

#[tokio::test]
async fn test_save_sends_trimmed_unlocked_body() {
    let (client, rec) = spawn_backend().await;
    let req = SaveNoteRequest::new("abc", "hello\n\n  ");
    client.save_note(&req, Some("t")).await.unwrap();

    let bodies = rec.bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![json!({"slug": "abc", "contentMd": "hello", "isLocked": 0})]
    );
}

#[tokio::test]
async fn test_delete_and_share_bodies() {
    let (client, rec) = spawn_backend().await;
    client.delete_note("abc", Some("t")).await.unwrap();
    client.share_note("abc", true, Some("t")).await.unwrap();
    client.share_note("abc", false, Some("t")).await.unwrap();

    let bodies = rec.bodies.lock().unwrap().clone();
    assert_eq!(bodies[0], json!({"slug": "abc"}));
    assert_eq!(bodies[1], json!({"slug": "abc", "isShared": 1}));
    assert_eq!(bodies[2], json!({"slug": "abc", "isShared": 0}));
}

#[tokio::test]
async fn test_search_trims_query() {
    let (client, rec) = spawn_backend().await;
    let results = client.search("  rust notes ", None).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].link_slug(), "pub-abc");

    let queries = rec.queries.lock().unwrap().clone();
    assert_eq!(queries[0].get("query").map(String::as_str), Some("rust notes"));
}

#[tokio::test]
async fn test_blank_search_skips_backend() {
    let (client, rec) = spawn_backend().await;
    let results = client.search("   ", None).await.unwrap();
    assert!(results.is_empty());
    assert!(rec.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_public_note_fetch() {
    let (client, _) = spawn_backend().await;
    let note = client.get_public_note("shared1", None).await.unwrap().unwrap();
    assert_eq!(note.content_md, "# shared1");
}

// ============================================================================
// Authentication and uploads
// ============================================================================

#[tokio::test]
async fn test_login_success_and_failure() {
    let (client, _) = spawn_backend().await;
    let ok = client.login("alice", "secret").await.unwrap();
    assert_eq!(ok.token.as_deref(), Some("tok-123"));

    let err = client.login("alice", "wrong").await.unwrap_err();
    assert_eq!(err.backend_message(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_login_401_keeps_backend_message() {
    let (client, _) = spawn_backend().await;
    let err = client.login("locked", "secret").await.unwrap_err();
    assert!(!err.is_unauthorized());
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.backend_message(), Some("Account locked"));
}

#[tokio::test]
async fn test_google_exchange() {
    let (client, _) = spawn_backend().await;
    let ok = client.login_google("good", "https://app/cb").await.unwrap();
    assert_eq!(ok.token.as_deref(), Some("g-tok"));

    let none = client.login_google("bad", "https://app/cb").await.unwrap();
    assert!(none.token.is_none());
}

#[tokio::test]
async fn test_upload_token_sends_key() {
    let (client, rec) = spawn_backend().await;
    let token = client.upload_token("123-abc.png", Some("t")).await.unwrap();
    assert_eq!(token.uptoken, "signed:123-abc.png");
    assert_eq!(
        rec.auth_headers.lock().unwrap().clone(),
        vec![Some("Bearer t".to_string())]
    );
}

#[test]
fn test_endpoint_keeps_base_path() {
    let client = ApiClient::new(Url::parse("https://example.com/backend/").unwrap()).unwrap();
    let url = client.endpoint(&["api", "note", "save"]).unwrap();
    assert_eq!(url.as_str(), "https://example.com/backend/api/note/save");
}
