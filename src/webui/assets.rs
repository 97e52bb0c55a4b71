//! Static file serving: the configured web directory first, then the assets
//! compiled into the binary.

use std::path::{Component, Path};

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;
use tracing::debug;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Embedded;

/// Used for any extension not listed in `content_type_for`.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

pub fn content_type_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Turn a request path into a relative `a/b.css` path under the web root.
/// Returns `None` for the root itself and for anything that would escape it.
pub fn normalize(request_path: &str) -> Option<String> {
    let path = request_path.split('?').next().unwrap_or_default();
    let decoded = urlencoding::decode(path).ok()?;

    let mut parts = Vec::new();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?.to_string()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

pub async fn serve(web_dir: &Path, request_path: &str) -> Response {
    let Some(relative) = normalize(request_path) else {
        return not_found();
    };
    let content_type = content_type_for(&relative);

    let on_disk = web_dir.join(&relative);
    if let Ok(bytes) = tokio::fs::read(&on_disk).await {
        return ([(header::CONTENT_TYPE, content_type)], bytes).into_response();
    }

    if let Some(file) = Embedded::get(&relative) {
        return ([(header::CONTENT_TYPE, content_type)], file.data.into_owned()).into_response();
    }

    debug!(path = %request_path, "Asset not found");
    not_found()
}

pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Not Found",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("app.js"), "application/javascript");
        assert_eq!(content_type_for("style.CSS"), "text/css");
        assert_eq!(content_type_for("data.json"), "application/json");
        assert_eq!(content_type_for("index.html"), "text/html");
        assert_eq!(content_type_for("notes.xyz"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for("Makefile"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/style.css").as_deref(), Some("style.css"));
        assert_eq!(normalize("/js/./app.js").as_deref(), Some("js/app.js"));
        assert_eq!(normalize("/data.js?v=3").as_deref(), Some("data.js"));
        assert_eq!(normalize("/a%20b.txt").as_deref(), Some("a b.txt"));
        assert_eq!(normalize("/"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn test_normalize_rejects_traversal() {
        assert_eq!(normalize("/../secret"), None);
        assert_eq!(normalize("/a/../../etc/passwd"), None);
        assert_eq!(normalize("/%2e%2e/secret"), None);
    }

    #[test]
    fn test_embedded_defaults_exist() {
        assert!(Embedded::get("style.css").is_some());
        assert!(Embedded::get("app.js").is_some());
    }
}
