use crate::{axum_http::http_serve::app, config::config_model::ServerConfig};
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use clipdeck_core::{
    config::ClipdeckConfig,
    entity::prelude::Platform,
    test_utils::account_input,
    ClipdeckCore,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "clipdeck-test-boundary";

struct TestApp {
    router: Router,
    _core: ClipdeckCore,
    _dir: TempDir,
}

async fn setup() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let core = ClipdeckCore::start(ClipdeckConfig::new(
        "sqlite::memory:",
        dir.path().join("uploads"),
    ))
    .await
    .expect("Failed to start core");

    let router = app(&core, &ServerConfig::default()).expect("Failed to build router");

    TestApp {
        router,
        _core: core,
        _dir: dir,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn upload(&self, parts: &[(&str, Option<&str>, &[u8])]) -> (StatusCode, Value) {
        let mut body = Vec::new();
        for (name, file_name, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: video/mp4\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/videos/upload")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}

fn gaming_set() -> Value {
    json!({
        "name": "Gaming",
        "description": "Main gaming brand",
        "accounts": [
            account_input(None, Platform::YouTube, "gaming_yt"),
            account_input(None, Platform::TikTok, "gaming_tt"),
            account_input(None, Platform::Instagram, "gaming_ig"),
        ],
    })
}

#[tokio::test]
async fn test_health_check_and_fallback() {
    let app = setup().await;

    let (status, _) = app.get("/api/v1/health-check").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/v1/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_schedule_and_mark_posted_flow() {
    let app = setup().await;

    let (status, set) = app
        .json(Method::POST, "/api/v1/account-sets", gaming_set())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(set["name"], "Gaming");
    assert_eq!(set["accounts"].as_array().unwrap().len(), 3);

    let (status, uploaded) = app
        .upload(&[
            ("title", None, b"Speedrun highlights".as_slice()),
            ("file", Some("run.mp4"), b"fake-mp4-bytes".as_slice()),
        ])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uploaded["video"]["title"], "Speedrun highlights");

    let (status, post) = app
        .json(
            Method::POST,
            "/api/v1/posts",
            json!({
                "video_id": uploaded["video"]["id"],
                "account_set_id": set["id"],
                "scheduled_date": "2030-01-15T18:00:00Z",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let statuses = post["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 3);
    assert!(statuses.iter().all(|s| s["is_posted"] == false));
    assert!(statuses.iter().all(|s| s["account"].get("password").is_none()));

    let post_id = post["id"].as_i64().unwrap();
    let account_id = statuses[0]["account"]["id"].as_i64().unwrap();

    let (status, marked) = app
        .json(
            Method::PUT,
            &format!("/api/v1/posts/{post_id}/statuses/{account_id}"),
            json!({ "is_posted": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["is_posted"], true);
    assert!(!marked["posted_at"].is_null());

    let (_, reloaded) = app.get(&format!("/api/v1/posts/{post_id}")).await;
    let posted: Vec<bool> = reloaded["statuses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["is_posted"].as_bool().unwrap())
        .collect();
    assert_eq!(posted, vec![true, false, false]);

    let (status, toggled) = app
        .json(
            Method::POST,
            &format!("/api/v1/posts/{post_id}/statuses/{account_id}/toggle"),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["is_posted"], false);
    assert!(toggled["posted_at"].is_null());
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let app = setup().await;

    let (status, body) = app.upload(&[("title", None, b"Orphan title".as_slice())]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file provided");
}

#[tokio::test]
async fn test_uploaded_file_is_served() {
    let app = setup().await;

    let (status, uploaded) = app
        .upload(&[("file", Some("My Clip!.mp4"), b"0123456789".as_slice())])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uploaded["video"]["title"], "My Clip!.mp4");
    assert_eq!(uploaded["video"]["duration"], "0:00");

    let file_path = uploaded["video"]["file_path"].as_str().unwrap().to_string();
    assert!(file_path.starts_with("/uploads/"));
    assert!(file_path.ends_with("-MyClip.mp4"));

    let request = Request::builder()
        .uri(file_path.as_str())
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = app.send_raw(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"0123456789");
}

#[tokio::test]
async fn test_update_roster_through_api() {
    let app = setup().await;

    let (_, set) = app
        .json(Method::POST, "/api/v1/account-sets", gaming_set())
        .await;
    let set_id = set["id"].as_i64().unwrap();
    let kept = set["accounts"][0].clone();

    let (status, updated) = app
        .json(
            Method::PUT,
            &format!("/api/v1/account-sets/{set_id}"),
            json!({
                "name": "Gaming",
                "accounts": [
                    kept,
                    account_input(None, Platform::TikTok, "fresh_tt"),
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = updated["accounts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["account_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["gaming_yt", "fresh_tt"]);

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/v1/account-sets/{set_id}"),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/v1/account-sets/{set_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_blank_set_name_is_rejected() {
    let app = setup().await;

    let (status, _) = app
        .json(
            Method::POST,
            "/api/v1/account-sets",
            json!({ "name": "  ", "accounts": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_stats_when_empty() {
    let app = setup().await;

    let (status, stats) = app.get("/api/v1/dashboard/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_posts"], 0);
    assert_eq!(stats["completion_rate"], 0);
}

#[tokio::test]
async fn test_upcoming_respects_limit() {
    let app = setup().await;

    let (_, set) = app
        .json(Method::POST, "/api/v1/account-sets", gaming_set())
        .await;
    let (_, uploaded) = app
        .upload(&[("file", Some("clip.mp4"), b"bytes".as_slice())])
        .await;

    for day in 1..=3 {
        let (status, _) = app
            .json(
                Method::POST,
                "/api/v1/posts",
                json!({
                    "video_id": uploaded["video"]["id"],
                    "account_set_id": set["id"],
                    "scheduled_date": format!("2099-03-0{day}T12:00:00Z"),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, upcoming) = app.get("/api/v1/posts/upcoming?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upcoming.as_array().unwrap().len(), 2);

    let (status, range) = app
        .get("/api/v1/posts?start=2099-03-02T00:00:00Z&end=2099-03-03T00:00:00Z")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(range.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_relative_uploads_prefix_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClipdeckConfig {
        uploads_url_prefix: "uploads".to_string(),
        ..ClipdeckConfig::new("sqlite::memory:", dir.path().to_path_buf())
    };
    let core = ClipdeckCore::start(config).await.unwrap();

    assert!(app(&core, &ServerConfig::default()).is_err());
}
