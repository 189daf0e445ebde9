#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{
        HeaderMap, StatusCode,
        header::{AUTHORIZATION, RETRY_AFTER},
    },
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};

use bangerid::config::{OAuthConfig, SPOTIFY_SCOPES};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const AUTH_CODE: &str = "good-code";
pub const ACCESS_TOKEN: &str = "access-1";
pub const REFRESHED_ACCESS_TOKEN: &str = "access-2";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const UNKNOWN_DEVICE: &str = "bad-device";

/// Starts a fake Spotify (accounts service and Web API) on a random port
/// and returns its base URL.
pub async fn spawn_fake_spotify() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let base = format!("http://{}", addr);

    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/me/tracks", get(saved_tracks))
        .route("/v1/me/player", get(player))
        .route("/v1/me/player/devices", get(devices))
        .route("/v1/me/player/play", put(play))
        .with_state(base.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base
}

pub fn test_config(base: &str) -> OAuthConfig {
    OAuthConfig {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: "http://127.0.0.1:3000/spotify-auth".to_string(),
        scopes: SPOTIFY_SCOPES.iter().map(|s| s.to_string()).collect(),
        auth_url: "https://accounts.example.com/authorize".to_string(),
        token_url: format!("{}/api/token", base),
        api_url: format!("{}/v1", base),
    }
}

/// Creates an empty scratch directory unique to `name`.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bangerid-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn authorized(headers: &HeaderMap) -> bool {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    value == format!("Bearer {}", ACCESS_TOKEN)
        || value == format!("Bearer {}", REFRESHED_ACCESS_TOKEN)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "Invalid access token" } })),
    )
        .into_response()
}

async fn token(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    let expected = format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", CLIENT_ID, CLIENT_SECRET))
    );
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_client" })),
        )
            .into_response();
    }

    let field = |name: &str| form.get(name).map(String::as_str);
    match field("grant_type") {
        Some("authorization_code") if field("code") == Some(AUTH_CODE) => Json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "scope": "user-library-read",
            "expires_in": 3600,
            "refresh_token": REFRESH_TOKEN
        }))
        .into_response(),
        Some("refresh_token") if field("refresh_token") == Some(REFRESH_TOKEN) => Json(json!({
            "access_token": REFRESHED_ACCESS_TOKEN,
            "token_type": "Bearer",
            "scope": "user-library-read",
            "expires_in": 3600
        }))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
            .into_response(),
    }
}

fn image(url: &str, size: u32) -> Value {
    json!({ "url": url, "height": size, "width": size })
}

async fn saved_tracks(
    State(base): State<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let second_page = query.get("offset").map(String::as_str) == Some("2");
    let body = if second_page {
        json!({
            "items": [
                {
                    "added_at": "2024-01-03T00:00:00Z",
                    "track": {
                        "id": "noimg",
                        "uri": "spotify:track:noimg",
                        "name": "No Artwork",
                        "artists": [{ "name": "Nobody" }],
                        "album": { "images": [] }
                    }
                },
                {
                    "added_at": "2024-01-04T00:00:00Z",
                    "track": {
                        "id": "four",
                        "uri": "spotify:track:four",
                        "name": "Fourth",
                        "linked_from": { "id": "", "uri": "" },
                        "artists": [],
                        "album": { "images": [image("img-64-d", 64), image("img-32-d", 32)] }
                    }
                }
            ],
            "next": null,
            "total": 4,
            "limit": 2,
            "offset": 2
        })
    } else {
        json!({
            "items": [
                {
                    "added_at": "2024-01-01T00:00:00Z",
                    "track": {
                        "id": "relinked",
                        "uri": "spotify:track:relinked",
                        "name": "Relinked Song",
                        "linked_from": { "id": "original", "uri": "spotify:track:original" },
                        "artists": [{ "name": "First Artist" }, { "name": "Featured" }],
                        "album": { "images": [image("img-640-a", 640), image("img-300-a", 300), image("img-64-a", 64)] }
                    }
                },
                {
                    "added_at": "2024-01-02T00:00:00Z",
                    "track": {
                        "id": "two",
                        "uri": "spotify:track:two",
                        "name": "Second",
                        "artists": [{ "name": "Second Artist" }],
                        "album": { "images": [image("img-640-b", 640), image("img-300-b", 300)] }
                    }
                }
            ],
            "next": format!("{}/v1/me/tracks?offset=2&limit=2", base),
            "total": 4,
            "limit": 2,
            "offset": 0
        })
    };

    Json(body).into_response()
}

async fn devices(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    Json(json!({
        "devices": [
            {
                "id": "dev-1",
                "is_active": true,
                "is_restricted": false,
                "name": "Laptop",
                "type": "Computer",
                "volume_percent": 80
            },
            {
                "id": null,
                "is_active": false,
                "is_restricted": true,
                "name": "Kitchen Speaker",
                "type": "Speaker",
                "volume_percent": null
            }
        ]
    }))
    .into_response()
}

async fn player(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    StatusCode::NO_CONTENT.into_response()
}

async fn play(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    if query.get("device_id").map(String::as_str) == Some(UNKNOWN_DEVICE) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "status": 404, "message": "Device not found" } })),
        )
            .into_response();
    }

    match body["uris"].as_array() {
        Some(uris) if uris.len() == 1 => StatusCode::NO_CONTENT.into_response(),
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

#[derive(Clone)]
struct Scripted {
    replies: Arc<Mutex<VecDeque<(StatusCode, Option<&'static str>)>>>,
    hits: Arc<AtomicUsize>,
}

/// Starts a fake Web API whose devices endpoint answers with the statuses
/// in `replies` (with an optional `Retry-After`), then with a device list.
///
/// Returns the base URL and the number of requests the endpoint has seen.
pub async fn spawn_scripted_devices(
    replies: Vec<(StatusCode, Option<&'static str>)>,
) -> (String, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let scripted = Scripted {
        replies: Arc::new(Mutex::new(replies.into())),
        hits: Arc::new(AtomicUsize::new(0)),
    };
    let hits = Arc::clone(&scripted.hits);

    let app = Router::new()
        .route("/v1/me/player/devices", get(scripted_devices))
        .with_state(scripted);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (base, hits)
}

async fn scripted_devices(State(scripted): State<Scripted>) -> Response {
    scripted.hits.fetch_add(1, Ordering::SeqCst);

    let next = scripted.replies.lock().unwrap().pop_front();
    match next {
        Some((status, Some(retry_after))) => {
            (status, [(RETRY_AFTER, retry_after)], "slow down").into_response()
        }
        Some((status, None)) => (status, "upstream failure").into_response(),
        None => Json(json!({
            "devices": [
                { "id": "dev-1", "is_active": true, "name": "Laptop", "type": "Computer" }
            ]
        }))
        .into_response(),
    }
}
