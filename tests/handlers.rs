//! Handler-level tests using tower::ServiceExt::oneshot.
//!
//! Tests the full Axum router (CORS layer + handlers) without binding a TCP
//! listener. Faster and more deterministic than E2E tests. Each test gets
//! its own temp data directory, seeded through the store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::collections::BTreeMap;
use telecast::config::Config;
use telecast::models::{Channel, Episode, Library};
use telecast::server::build_router;
use telecast::store::Store;
use tempfile::TempDir;
use tower::ServiceExt;

/// Build a test config rooted in a temp data directory.
fn test_config(dir: &TempDir) -> Config {
    Config {
        port: 0,
        data_dir: dir.path().to_string_lossy().into_owned(),
        probe_timeout_secs: 1,
        ffprobe_path: "/bin/false".to_string(),
    }
}

fn episode(path: &str, duration: f64) -> Episode {
    Episode {
        name: path.rsplit('/').next().unwrap().to_string(),
        path: path.to_string(),
        show: "cartoons".to_string(),
        duration,
    }
}

/// Seed one channel over one folder with a 600s and a 400s episode.
async fn seed_cartoons(store: &Store) {
    let channels = vec![Channel {
        id: "cartoons".to_string(),
        name: "Cartoons".to_string(),
        folders: vec!["/media/cartoons".to_string()],
    }];
    let mut library: Library = BTreeMap::new();
    library.insert(
        "/media/cartoons".to_string(),
        vec![
            episode("/media/cartoons/a.mp4", 600.0),
            episode("/media/cartoons/b.mp4", 400.0),
        ],
    );
    store.write_channels(&channels).await.unwrap();
    store.write_library(&library).await.unwrap();
}

// ── Health endpoint ─────────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_200_with_json() {
    let dir = TempDir::new().unwrap();
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["channels"].is_number());
}

#[tokio::test]
async fn root_path_returns_health() {
    let dir = TempDir::new().unwrap();
    let app = build_router(test_config(&dir));

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ── Status endpoint ─────────────────────────────────────────────────────────

#[tokio::test]
async fn status_for_unknown_channel_is_null_with_200() {
    let dir = TempDir::new().unwrap();
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .uri("/api/status?channel=nope")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "no program is not an error");

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json.is_null());
}

#[tokio::test]
async fn status_returns_current_schedule() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    seed_cartoons(&Store::new(dir.path())).await;
    let app = build_router(config);

    let req = Request::builder()
        .uri("/api/status?channel=cartoons")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["channel_id"], "cartoons");
    assert_eq!(json["channel"], "Cartoons");
    assert_eq!(json["pool_size"], 2);
    assert_eq!(json["episode"]["show"], "cartoons");

    let elapsed = json["elapsed"].as_f64().unwrap();
    let total = json["total"].as_f64().unwrap();
    let next_in = json["next_in"].as_f64().unwrap();
    assert!(elapsed >= 0.0 && elapsed < total);
    assert_eq!(elapsed + next_in, total);
}

#[tokio::test]
async fn status_without_channel_maps_all_channels() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let store = Store::new(dir.path());
    seed_cartoons(&store).await;

    // A second channel with no library entry: present in the map, but null.
    let mut channels = store.read_channels().await;
    channels.push(Channel {
        id: "news".to_string(),
        name: "News".to_string(),
        folders: vec!["/media/news".to_string()],
    });
    store.write_channels(&channels).await.unwrap();

    let app = build_router(config);
    let req = Request::builder()
        .uri("/api/status")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["cartoons"].is_object());
    assert!(json["news"].is_null());
}

// ── Channel registry ────────────────────────────────────────────────────────

#[tokio::test]
async fn channels_replace_then_list_round_trips() {
    let dir = TempDir::new().unwrap();
    let app = build_router(test_config(&dir));

    let channels = serde_json::json!([
        { "id": "cartoons", "name": "Cartoons", "folders": ["/media/cartoons"] },
        { "id": "movies", "name": "Movies", "folders": ["/media/movies"] },
    ]);

    let req = Request::builder()
        .method("POST")
        .uri("/api/channels")
        .header("content-type", "application/json")
        .body(Body::from(channels.to_string()))
        .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);

    let req = Request::builder()
        .uri("/api/channels")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let listed: Vec<Channel> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "cartoons");
    assert_eq!(listed[1].folders, vec!["/media/movies".to_string()]);
}

#[tokio::test]
async fn scan_trigger_returns_success() {
    let dir = TempDir::new().unwrap();
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .method("POST")
        .uri("/api/scan")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
}

// ── Browse endpoint ─────────────────────────────────────────────────────────

#[tokio::test]
async fn browse_lists_child_directories() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("shows")).unwrap();
    std::fs::write(dir.path().join("file.txt"), b"not a dir").unwrap();

    let app = build_router(test_config(&dir));
    let req = Request::builder()
        .uri(format!("/api/browse?path={}", dir.path().display()))
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let dirs = json["directories"].as_array().unwrap();
    assert_eq!(dirs.len(), 1, "plain files must not be listed");
    assert_eq!(dirs[0]["name"], "shows");
}

#[tokio::test]
async fn browse_missing_path_is_404() {
    let dir = TempDir::new().unwrap();
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .uri("/api/browse?path=/definitely/not/here")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Video delivery ──────────────────────────────────────────────────────────

/// 1000 distinguishable bytes so slices can be checked exactly.
fn test_media(dir: &TempDir) -> (String, Vec<u8>) {
    let content: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, &content).unwrap();
    (path.to_string_lossy().into_owned(), content)
}

#[tokio::test]
async fn video_without_range_serves_full_file() {
    let dir = TempDir::new().unwrap();
    let (path, content) = test_media(&dir);
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .uri(format!("/video?path={}", path))
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["accept-ranges"], "bytes");
    assert_eq!(resp.headers()["content-type"], "video/mp4");
    assert_eq!(resp.headers()["content-length"], "1000");

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), content.as_slice());
}

#[tokio::test]
async fn video_range_serves_exact_slice() {
    let dir = TempDir::new().unwrap();
    let (path, content) = test_media(&dir);
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .uri(format!("/video?path={}", path))
        .header("range", "bytes=100-199")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(resp.headers()["content-range"], "bytes 100-199/1000");
    assert_eq!(resp.headers()["content-length"], "100");
    assert_eq!(resp.headers()["accept-ranges"], "bytes");

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), &content[100..200]);
}

#[tokio::test]
async fn video_open_ended_range_runs_to_eof() {
    let dir = TempDir::new().unwrap();
    let (path, content) = test_media(&dir);
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .uri(format!("/video?path={}", path))
        .header("range", "bytes=900-")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(resp.headers()["content-range"], "bytes 900-999/1000");

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), &content[900..]);
}

#[tokio::test]
async fn video_malformed_range_serves_full_file() {
    let dir = TempDir::new().unwrap();
    let (path, content) = test_media(&dir);
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .uri(format!("/video?path={}", path))
        .header("range", "bytes=oops")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.len(), content.len());
}

#[tokio::test]
async fn video_missing_file_is_404() {
    let dir = TempDir::new().unwrap();
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .uri("/video?path=/no/such/file.mp4")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn video_responses_carry_cors_headers() {
    let dir = TempDir::new().unwrap();
    let (path, _) = test_media(&dir);
    let app = build_router(test_config(&dir));

    let req = Request::builder()
        .uri(format!("/video?path={}", path))
        .header("origin", "https://cast.example.com")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let exposed = resp.headers()["access-control-expose-headers"]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(exposed.contains("content-range"));
    assert!(exposed.contains("accept-ranges"));
}
