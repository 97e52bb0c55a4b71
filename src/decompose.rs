//! Persists agent-produced task lists, one JSON file per task under
//! `<data_dir>/tasks/`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use serde_json::{Map, Value};
use tracing::{debug, info};

pub const TASKS_DIR: &str = "tasks";
pub const DEFAULT_STATUS: &str = "todo";

pub fn tasks_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(TASKS_DIR)
}

/// Short random id, the first block of a v4 UUID.
fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn task_id(task: &Map<String, Value>) -> Result<String> {
    let id = match task.get("id") {
        None | Some(Value::Null) => return Ok(new_id()),
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
    };
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        bail!("Invalid task id '{}'", id);
    }
    Ok(id)
}

/// Fill in `id`, `status` and the timestamps, then write `<id>.json`.
/// An existing file with the same id is overwritten.
pub fn save_task(dir: &Path, mut task: Map<String, Value>) -> Result<String> {
    let id = task_id(&task)?;
    let now = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();

    task.insert("id".to_string(), Value::String(id.clone()));
    task.entry("status")
        .or_insert_with(|| Value::String(DEFAULT_STATUS.to_string()));
    task.insert("created_at".to_string(), Value::String(now.clone()));
    task.insert("updated_at".to_string(), Value::String(now));

    let path = dir.join(format!("{id}.json"));
    let json = serde_json::to_string_pretty(&Value::Object(task))?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(%id, path = %path.display(), "Saved task");
    Ok(id)
}

/// Save every task in `raw_tasks`, a JSON array of objects. Returns the ids
/// in input order.
pub fn decompose(dir: &Path, vision: &str, raw_tasks: &str) -> Result<Vec<String>> {
    let tasks: Vec<Value> = serde_json::from_str(raw_tasks).context("Tasks must be a JSON array")?;
    let tasks = tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| match task {
            Value::Object(map) => Ok(map),
            _ => bail!("Task #{} is not a JSON object", i + 1),
        })
        .collect::<Result<Vec<_>>>()?;

    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    info!(%vision, tasks = tasks.len(), dir = %dir.display(), "Decomposing vision");

    tasks.into_iter().map(|task| save_task(dir, task)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(dir: &Path, id: &str) -> Value {
        let text = std::fs::read_to_string(dir.join(format!("{id}.json"))).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let ids = decompose(
            dir.path(),
            "登入系統",
            r#"[{"title": "實作登入功能"}, {"id": "docs", "title": "撰寫文件", "status": "done"}]"#,
        )
        .unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].len(), 8);
        assert_eq!(ids[1], "docs");

        let first = read(dir.path(), &ids[0]);
        assert_eq!(first["id"], ids[0].as_str());
        assert_eq!(first["status"], "todo");
        assert_eq!(first["title"], "實作登入功能");
        assert!(first["created_at"].is_string());
        assert_eq!(first["created_at"], first["updated_at"]);

        let docs = read(dir.path(), "docs");
        assert_eq!(docs["status"], "done");
    }

    #[test]
    fn test_numeric_id_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let ids = decompose(dir.path(), "v", r#"[{"id": 42}]"#).unwrap();
        assert_eq!(ids, vec!["42".to_string()]);
        assert_eq!(read(dir.path(), "42")["id"], "42");
    }

    #[test]
    fn test_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(decompose(dir.path(), "v", r#"{"title": "x"}"#).is_err());
        assert!(decompose(dir.path(), "v", r#"[{"title": "x"}, 3]"#).is_err());
        // nothing written when any element is invalid
        assert!(!dir.path().join("x.json").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        assert!(decompose(dir.path(), "v", r#"[{"id": "../escape"}]"#).is_err());
        assert!(decompose(dir.path(), "v", r#"[{"id": ".."}]"#).is_err());
    }
}
