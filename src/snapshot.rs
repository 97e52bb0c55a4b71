//! Reading and writing the `LUMI_DATA` snapshot.
//!
//! A snapshot lives on disk either as plain JSON (`global_state.json`) or as
//! the script the page loads (`data.js`, `window.LUMI_DATA = {...};`). Both
//! forms are accepted wherever a snapshot is read.

use std::path::{Path, PathBuf};

use crate::types::Snapshot;

/// Name of the global the page script assigns the snapshot to.
pub const GLOBAL_NAME: &str = "LUMI_DATA";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("no snapshot found at {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot script does not assign window.LUMI_DATA")]
    NotAssigned,

    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse snapshot text in either the JSON or the script form.
pub fn parse(text: &str) -> Result<Snapshot, SnapshotError> {
    let trimmed = text.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('{') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let after_name = trimmed
        .find(GLOBAL_NAME)
        .map(|idx| &trimmed[idx + GLOBAL_NAME.len()..])
        .ok_or(SnapshotError::NotAssigned)?;
    let value = after_name
        .trim_start()
        .strip_prefix('=')
        .ok_or(SnapshotError::NotAssigned)?
        .trim()
        .trim_end_matches(';');

    Ok(serde_json::from_str(value)?)
}

pub fn load(path: &Path) -> Result<Snapshot, SnapshotError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    parse(&text)
}

pub async fn load_async(path: &Path) -> Result<Snapshot, SnapshotError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))?;
    parse(&text)
}

fn io_error(path: &Path, source: std::io::Error) -> SnapshotError {
    if source.kind() == std::io::ErrorKind::NotFound {
        SnapshotError::Missing(path.to_path_buf())
    } else {
        SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Render the snapshot as the `data.js` script the page includes.
pub fn to_script(snapshot: &Snapshot) -> Result<String, SnapshotError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    Ok(format!("window.{GLOBAL_NAME} = {json};"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let snapshot = parse(r#"{ "projects_count": 2, "projects": {} }"#).unwrap();
        assert_eq!(snapshot.projects_count, 2);
    }

    #[test]
    fn test_parse_script_form() {
        let text = "window.LUMI_DATA = {\n  \"is_thinking\": true\n};\n";
        let snapshot = parse(text).unwrap();
        assert!(snapshot.is_thinking);
    }

    #[test]
    fn test_script_round_trip() {
        let mut snapshot = Snapshot::default();
        snapshot.projects_count = 7;
        snapshot.last_scan = Some("2026-01-01T00:00:00".into());

        let script = to_script(&snapshot).unwrap();
        assert!(script.starts_with("window.LUMI_DATA = {"));
        assert!(script.ends_with("};"));

        let parsed = parse(&script).unwrap();
        assert_eq!(parsed.projects_count, 7);
        assert_eq!(parsed.last_scan.as_deref(), Some("2026-01-01T00:00:00"));
    }

    #[test]
    fn test_parse_script_without_assignment() {
        assert!(matches!(
            parse("console.log('hello');"),
            Err(SnapshotError::NotAssigned)
        ));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(
            parse("window.LUMI_DATA = { nope };"),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.js");
        assert!(matches!(load(&path), Err(SnapshotError::Missing(p)) if p == path));
    }
}
