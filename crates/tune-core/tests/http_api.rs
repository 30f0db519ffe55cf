//! HttpSongApi against a fake backend served by axum on a loopback port.
//!
//! Run with: cargo test -p tune-core --test http_api

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use tune_core::api::{HttpSongApi, SongApi};
use tune_core::error::ApiError;

const GOOD_TOKEN: &str = "good-token";

#[derive(Clone, Default)]
struct Backend {
    searches: Arc<Mutex<Vec<HashMap<String, String>>>>,
    interactions: Arc<Mutex<Vec<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", GOOD_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status": 401, "message": "Invalid token"})),
    )
        .into_response()
}

async fn search(State(backend): State<Backend>, Query(params): Query<HashMap<String, String>>) -> Response {
    backend.searches.lock().unwrap().push(params.clone());
    let query = params.get("query").cloned().unwrap_or_default();
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);

    if query == "explode" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    if query == "garbled" {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }

    let content: Vec<Value> = if query.is_empty() {
        vec![
            json!({"id": 1, "title": "Intro", "artist": {"id": 1, "fullName": "Various"}, "duration": 60}),
            json!({"id": 2, "title": "So What", "artist": {"id": 2, "fullName": "Miles Davis"}, "duration": 545}),
        ]
    } else {
        vec![json!({"id": 10 + page, "title": format!("{} #{}", query, page), "duration": 200})]
    };
    Json(json!({
        "content": content,
        "pageable": {"pageNumber": page, "pageSize": 20},
        "last": page >= 1,
        "totalPages": 2
    }))
    .into_response()
}

async fn liked(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"id": 2, "title": "So What", "artist": {"fullName": "Miles Davis"}, "duration": 545}
    ]))
    .into_response()
}

async fn interactions(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    backend.interactions.lock().unwrap().push(body);
    (StatusCode::CREATED, Json(json!({"ok": true}))).into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"id": 77, "email": "ana@example.com", "fullName": "Ana"})).into_response()
}

async fn start_backend() -> (HttpSongApi, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/songs/search", get(search))
        .route("/api/songs/liked", get(liked))
        .route("/api/interactions", post(interactions))
        .route("/api/users/me", get(me))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = HttpSongApi::new(format!("http://{}/api/", addr), Duration::from_secs(5)).unwrap();
    (api, backend)
}

#[tokio::test]
async fn search_sends_query_and_page_and_adapts_body() {
    let (api, backend) = start_backend().await;

    let page = api.search("blue note", 1).await.unwrap();
    assert_eq!(page.page_number, 1);
    assert!(page.is_last);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].title, "blue note #1");
    assert_eq!(page.content[0].display_artist(), "Unknown Artist");

    let searches = backend.searches.lock().unwrap().clone();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].get("query").map(String::as_str), Some("blue note"));
    assert_eq!(searches[0].get("page").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn empty_query_lists_default_catalogue() {
    let (api, backend) = start_backend().await;

    let page = api.search("", 0).await.unwrap();
    assert_eq!(page.page_number, 0);
    assert!(!page.is_last);
    let titles: Vec<_> = page.content.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Intro", "So What"]);
    assert_eq!(page.content[1].display_artist(), "Miles Davis");

    // The empty query is still sent as a parameter.
    let searches = backend.searches.lock().unwrap().clone();
    assert_eq!(searches[0].get("query").map(String::as_str), Some(""));
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let (api, _backend) = start_backend().await;

    match api.search("explode", 0).await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_maps_to_decode() {
    let (api, _backend) = start_backend().await;

    let err = api.search("garbled", 0).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    assert!(err.is_network_or_server());
}

#[tokio::test]
async fn liked_songs_use_bearer_token() {
    let (api, _backend) = start_backend().await;

    let songs = api.liked_songs(GOOD_TOKEN).await.unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].id, 2);

    let err = api.liked_songs("stale").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "server returned 401 Unauthorized: Invalid token");
}

#[tokio::test]
async fn interaction_posts_camel_case_body() {
    let (api, backend) = start_backend().await;

    api.record_interaction(2, 545, GOOD_TOKEN).await.unwrap();
    let bodies = backend.interactions.lock().unwrap().clone();
    assert_eq!(bodies, vec![json!({"songId": 2, "duration": 545})]);

    assert!(api.record_interaction(2, 545, "nope").await.is_err());
}

#[tokio::test]
async fn me_returns_user() {
    let (api, _backend) = start_backend().await;

    let user = api.me(GOOD_TOKEN).await.unwrap();
    assert_eq!(user.id, 77);
    assert_eq!(user.full_name.as_deref(), Some("Ana"));
    assert_eq!(user.avatar, None);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpSongApi::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let err = api.search("", 0).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}
