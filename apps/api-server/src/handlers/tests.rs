use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use actix_web::{App, http::StatusCode, http::header, test, web};
use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;

use vibe_core::SuggestionError;
use vibe_core::ports::{
    HashtagSuggester, PostRepository, RateLimitError, RateLimitResult, RateLimiter,
};
use vibe_infra::{DiskImageStore, InMemoryPostStore, JsonFilePostStore};

use super::configure_routes;
use crate::state::{AppState, UPLOADS_PATH};

const BOUNDARY: &str = "vibe-boundary";

struct FixedSuggester(Result<Vec<&'static str>, ()>);

#[async_trait]
impl HashtagSuggester for FixedSuggester {
    async fn suggest(&self, _text: &str) -> Result<Vec<String>, SuggestionError> {
        match &self.0 {
            Ok(tags) => Ok(tags.iter().map(|t| t.to_string()).collect()),
            Err(()) => Err(SuggestionError::Request("connection refused".into())),
        }
    }
}

/// Allows the first `allowed` requests, then denies.
struct CountingLimiter {
    allowed: u32,
    seen: AtomicU32,
}

#[async_trait]
impl RateLimiter for CountingLimiter {
    async fn check(&self, _key: &str) -> Result<RateLimitResult, RateLimitError> {
        if self.seen.fetch_add(1, Ordering::SeqCst) < self.allowed {
            Ok(RateLimitResult::allowed())
        } else {
            Ok(RateLimitResult::denied(Duration::from_secs(30)))
        }
    }
}

fn state_with(
    repo: Arc<dyn PostRepository>,
    dir: &TempDir,
    suggester: FixedSuggester,
    limiter: Option<Arc<dyn RateLimiter>>,
) -> AppState {
    let images = Arc::new(DiskImageStore::new(dir.path().join("uploads"), UPLOADS_PATH));
    AppState::build(repo, images, Arc::new(suggester), limiter)
}

fn default_state(dir: &TempDir) -> AppState {
    state_with(
        Arc::new(InMemoryPostStore::new()),
        dir,
        FixedSuggester(Ok(vec!["#sunny"])),
        None,
    )
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn submit_request(parts: &[Part<'_>]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}

#[actix_web::test]
async fn test_health_check() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(default_state(&dir)))
            .configure(configure_routes),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_submit_with_image_then_fetch_feed_and_image() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(default_state(&dir)))
            .configure(configure_routes),
    )
    .await;

    let req = submit_request(&[
        Part::Text("text", "rainy but cozy"),
        Part::Text("hashtags", "#rain,,#tea"),
        Part::File("image", "window view.png", b"\x89PNG fake"),
    ])
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Vibe posted!");
    assert_eq!(body["data"]["hashtags"], serde_json::json!(["#rain", "#tea"]));
    let image_url = body["data"]["imageUrl"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with("-window-view.png"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
    let feed: Value = test::read_body_json(resp).await;
    assert_eq!(feed["posts"].as_array().unwrap().len(), 1);
    assert_eq!(feed["posts"][0]["text"], "rainy but cozy");
    assert_eq!(feed["posts"][0]["id"], body["data"]["id"]);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&image_url).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"\x89PNG fake");
}

#[actix_web::test]
async fn test_empty_text_is_a_field_error() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(default_state(&dir)))
            .configure(configure_routes),
    )
    .await;

    let resp = test::call_service(&app, submit_request(&[Part::Text("text", "")]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["text"][0], "Mood cannot be empty.");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
    let feed: Value = test::read_body_json(resp).await;
    assert!(feed["posts"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_text_past_field_buffer_is_too_long() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(default_state(&dir)))
            .configure(configure_routes),
    )
    .await;

    let huge = "a".repeat(70_000);
    let resp = test::call_service(&app, submit_request(&[Part::Text("text", &huge)]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["text"][0], "Mood is too long.");

    // A cut through a multi-byte character is still a length error.
    let wide = "€".repeat(30_000);
    let resp = test::call_service(&app, submit_request(&[Part::Text("text", &wide)]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["text"][0], "Mood is too long.");
}

#[actix_web::test]
async fn test_oversized_image_is_rejected_and_not_stored() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(default_state(&dir)))
            .configure(configure_routes),
    )
    .await;

    let big = vec![0u8; 4 * 1024 * 1024 + 1];
    let req = submit_request(&[Part::Text("text", "big"), Part::File("image", "big.png", &big)]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["image"][0], "Image size must be less than 4MB.");
    assert!(!dir.path().join("uploads").exists());
}

#[actix_web::test]
async fn test_persistence_failure_reports_general_error_and_removes_image() {
    let dir = TempDir::new().unwrap();
    // A directory where the posts file should be makes every write fail.
    let posts_path = dir.path().join("posts.json");
    std::fs::create_dir_all(posts_path.join("occupied")).unwrap();
    let state = state_with(
        Arc::new(JsonFilePostStore::new(&posts_path)),
        &dir,
        FixedSuggester(Ok(vec![])),
        None,
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = submit_request(&[
        Part::Text("text", "doomed"),
        Part::File("image", "a.png", b"png"),
    ])
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Failed to create post.");

    let leftovers = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[actix_web::test]
async fn test_suggestions() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(default_state(&dir)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/hashtags/suggestions")
        .set_json(serde_json::json!({ "text": "what a bright morning" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, serde_json::json!({ "hashtags": ["#sunny"] }));

    let req = test::TestRequest::post()
        .uri("/api/hashtags/suggestions")
        .set_json(serde_json::json!({ "text": "   " }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, serde_json::json!({ "hashtags": [] }));
}

#[actix_web::test]
async fn test_suggestion_failure_returns_empty_list() {
    let dir = TempDir::new().unwrap();
    let state = state_with(
        Arc::new(InMemoryPostStore::new()),
        &dir,
        FixedSuggester(Err(())),
        None,
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/hashtags/suggestions")
        .set_json(serde_json::json!({ "text": "hello there" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "hashtags": [] }));
}

#[actix_web::test]
async fn test_suggestions_are_rate_limited() {
    let dir = TempDir::new().unwrap();
    let limiter = Arc::new(CountingLimiter {
        allowed: 1,
        seen: AtomicU32::new(0),
    });
    let state = state_with(
        Arc::new(InMemoryPostStore::new()),
        &dir,
        FixedSuggester(Ok(vec!["#x"])),
        Some(limiter),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let request = || {
        test::TestRequest::post()
            .uri("/api/hashtags/suggestions")
            .set_json(serde_json::json!({ "text": "again" }))
            .to_request()
    };

    assert_eq!(test::call_service(&app, request()).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get("Retry-After").unwrap(), "30");
}

#[actix_web::test]
async fn test_unknown_upload_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(default_state(&dir)))
            .configure(configure_routes),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/uploads/nope.png").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
