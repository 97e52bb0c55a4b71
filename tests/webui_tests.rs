use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lumi_lib::webui::{router, AppState};
use tower::ServiceExt;

const SNAPSHOT: &str = r##"window.LUMI_DATA = {
  "projects": {
    "lumi": {
      "name": "lumi",
      "rel_path": "lumi",
      "status": "active",
      "progress": "1/3",
      "markers": ["todo.md"],
      "tasks": [
        {"phase": "General", "title": "規劃架構", "status": "done"},
        {"phase": "General", "title": "實作登入功能", "status": "todo"},
        {"phase": "General", "title": "撰寫文件", "status": "todo"}
      ],
      "files": [
        {"name": "README.md", "rel_path": "README.md", "ext": ".md", "content": "# Lumi <script>x</script>"}
      ]
    },
    "lumi/docs": {"name": "docs", "rel_path": "lumi/docs"}
  },
  "projects_count": 2,
  "last_scan": "2026-02-03T10:00:00",
  "is_thinking": true,
  "dialogue": [
    {"role": "user", "content": "hi", "timestamp": "2026-02-03T09:59:00"}
  ],
  "cron_jobs": []
};"##;

fn app(web_dir: &Path, snapshot_path: &Path) -> Router {
    router(Arc::new(AppState::new(
        web_dir.to_path_buf(),
        snapshot_path.to_path_buf(),
    )))
}

fn app_with_snapshot() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("data.js");
    std::fs::write(&snapshot, SNAPSHOT).unwrap();
    let app = app(dir.path(), &snapshot);
    (dir, app)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8_lossy(&body).to_string())
}

#[tokio::test]
async fn test_index_renders_dashboard() {
    let (_dir, app) = app_with_snapshot();
    let (status, content_type, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains(r#"id="project-list""#));
    assert!(body.contains("Last Scan:"));
    assert!(body.contains("Progress: 1/3 (33%)"));
    // ancestors come before nested projects
    let lumi = body.find("📂 lumi</span>").unwrap();
    let docs = body.find("📂 lumi/docs</span>").unwrap();
    assert!(lumi < docs);
}

#[tokio::test]
async fn test_index_without_snapshot_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, body) = get(app(dir.path(), &dir.path().join("data.js")), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"id="project-list""#));
}

#[tokio::test]
async fn test_kanban_view_buckets_tasks() {
    let (_dir, app) = app_with_snapshot();
    let (status, _, body) = get(app, "/views/kanban?kanban_project=lumi").await;

    assert_eq!(status, StatusCode::OK);
    let in_progress = body.find(r#"id="col-in-progress""#).unwrap();
    let done = body.find(r#"id="col-done""#).unwrap();
    let login = body.find("實作登入功能").unwrap();
    assert!(login > in_progress && login < done);
    let docs = body.find("撰寫文件").unwrap();
    assert!(docs < in_progress);
}

#[tokio::test]
async fn test_explorer_view_previews_markdown_without_raw_html() {
    let (_dir, app) = app_with_snapshot();
    let (status, _, body) = get(
        app,
        "/views/explorer?explorer_project=lumi&file=README.md",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>"));
    assert!(body.contains("markdown-body"));
    assert!(!body.contains("<script>x</script>"));
}

#[tokio::test]
async fn test_unknown_view_is_not_found() {
    let (_dir, app) = app_with_snapshot();
    let (status, _, _) = get(app, "/views/bogus").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_snapshot() {
    let (_dir, app) = app_with_snapshot();
    let (status, content_type, body) = get(app, "/api/snapshot").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("application/json"));
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["projects_count"], 2);
    let keys: Vec<&String> = value["projects"].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 2);
}

#[tokio::test]
async fn test_api_snapshot_missing_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, body) = get(app(dir.path(), &dir.path().join("data.js")), "/api/snapshot").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("error"));
}

#[tokio::test]
async fn test_embedded_stylesheet() {
    let dir = tempfile::tempdir().unwrap();
    let (status, content_type, body) = get(app(dir.path(), &dir.path().join("data.js")), "/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/css");
    assert!(!body.is_empty());
}

#[tokio::test]
async fn test_disk_files_win_and_unknown_extensions_are_html() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("style.css"), "body{}").unwrap();
    std::fs::write(dir.path().join("notes.xyz"), "plain").unwrap();

    let (_, _, css) = get(app(dir.path(), &dir.path().join("data.js")), "/style.css").await;
    assert_eq!(css, "body{}");

    let (status, content_type, body) = get(app(dir.path(), &dir.path().join("data.js")), "/notes.xyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/html");
    assert_eq!(body, "plain");
}

#[tokio::test]
async fn test_data_script_is_served() {
    let (_dir, app) = app_with_snapshot();
    let (status, content_type, body) = get(app, "/data.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/javascript");
    assert!(body.starts_with("window.LUMI_DATA"));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, body) = get(app(dir.path(), &dir.path().join("data.js")), "/nope.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Found");
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let outer = tempfile::tempdir().unwrap();
    let web = outer.path().join("web");
    std::fs::create_dir_all(&web).unwrap();
    std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();

    let (status, _, body) = get(app(&web, &web.join("data.js")), "/%2e%2e/secret.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.contains("secret"));
}

#[tokio::test]
async fn test_page_script_swaps_views_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let (status, content_type, script) = get(app(dir.path(), &dir.path().join("data.js")), "/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/javascript");

    // selector changes fetch only the bound view
    assert!(script.contains("swapView(target, params)"));
    assert!(script.contains("fetch(`/views/${tab}${query}`)"));
    // nav links follow the state of the last swap
    assert!(script.contains("refreshNav(params)"));
}
