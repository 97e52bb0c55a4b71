use std::path::Path;

use walkdir::WalkDir;

use crate::types::ProjectFile;

/// Extensions worth previewing.
pub const PREVIEW_EXTENSIONS: [&str; 10] = [
    "md", "py", "js", "json", "css", "html", "txt", "sh", "yml", "yaml",
];

/// Directories never descended into while listing files.
pub const SKIP_DIRS: [&str; 5] = [".git", "node_modules", "venv", "__pycache__", ".openclaw"];

/// Files at or above this size are listed without content.
pub const MAX_CONTENT_BYTES: u64 = 50_000;

pub const READ_ERROR_PLACEHOLDER: &str = "[Error reading file]";

/// Every previewable file under `project_path`, sorted by path.
pub fn scan_files(project_path: &Path) -> Vec<ProjectFile> {
    let walker = WalkDir::new(project_path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !SKIP_DIRS.contains(&entry.file_name().to_string_lossy().as_ref())
        });

    let mut files = Vec::new();
    for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .filter(|e| PREVIEW_EXTENSIONS.contains(&e.as_str()))
        else {
            continue;
        };
        let Ok(relative) = path.strip_prefix(project_path) else {
            continue;
        };

        files.push(ProjectFile {
            name: entry.file_name().to_string_lossy().to_string(),
            rel_path: to_slash(relative),
            ext: Some(format!(".{ext}")),
            content: Some(read_content(path)),
        });
    }
    files
}

fn read_content(path: &Path) -> String {
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(u64::MAX);
    if size >= MAX_CONTENT_BYTES {
        return String::new();
    }
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => READ_ERROR_PLACEHOLDER.to_string(),
    }
}

/// Relative path with `/` separators, `.` for the path itself.
pub fn to_slash(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
