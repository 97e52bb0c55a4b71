//! Workspace scanner: walks a workspace, detects projects and writes the
//! snapshot the dashboard reads.

pub mod files;
pub mod sources;
pub mod todo;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::config::Settings;
use crate::snapshot;
use crate::types::{Project, ProjectMap, Snapshot};

/// A directory containing any of these is a project.
pub const PROJECT_MARKERS: [&str; 5] = [".git", "AGENTS.md", "package.json", "README.md", "todo.md"];

/// Directories the project search never descends into.
pub const SKIP_DIRS: [&str; 6] = [".git", "node_modules", "venv", "__pycache__", ".openclaw", "data"];

pub const ROOT_ID: &str = ".";
pub const ROOT_NAME: &str = "workspace-root";
pub const STATE_FILE: &str = "global_state.json";
pub const SCRIPT_FILE: &str = "data.js";

pub struct Scanner {
    root: PathBuf,
    max_depth: usize,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, max_depth: usize) -> Self {
        Self {
            root: root.into(),
            max_depth,
        }
    }

    /// Every project under the root, in depth-first name order.
    pub fn scan_workspace(&self) -> ProjectMap {
        let mut projects = ProjectMap::new();
        self.scan_dir(&self.root, 0, &mut projects);
        projects
    }

    fn scan_dir(&self, dir: &Path, depth: usize, projects: &mut ProjectMap) {
        if depth > self.max_depth {
            return;
        }
        let mut entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries.filter_map(|e| e.ok()).collect::<Vec<_>>(),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                return;
            }
        };
        entries.sort_by_key(|e| e.file_name());

        let names: Vec<String> = entries
            .iter()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        let markers: Vec<String> = PROJECT_MARKERS
            .iter()
            .filter(|m| names.iter().any(|n| n == *m))
            .map(|m| m.to_string())
            .collect();

        if !markers.is_empty() {
            let id = dir
                .strip_prefix(&self.root)
                .map(files::to_slash)
                .unwrap_or_else(|_| ROOT_ID.to_string());
            debug!(%id, ?markers, "Found project");
            let project = self.project_info(dir, &id, markers);
            projects.insert(id, project);
        }

        for entry in entries {
            let is_dir = entry.path().is_dir();
            let name = entry.file_name();
            if is_dir && !SKIP_DIRS.contains(&name.to_string_lossy().as_ref()) {
                self.scan_dir(&entry.path(), depth + 1, projects);
            }
        }
    }

    fn project_info(&self, dir: &Path, id: &str, markers: Vec<String>) -> Project {
        let name = if id == ROOT_ID {
            ROOT_NAME.to_string()
        } else {
            dir.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| id.to_string())
        };
        let has = |marker: &str| markers.iter().any(|m| m == marker);
        let has_todo = has("todo.md");

        let tasks = if has_todo {
            std::fs::read(dir.join("todo.md"))
                .map(|bytes| todo::parse_tasks(&String::from_utf8_lossy(&bytes)))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        Project {
            name,
            path: Some(
                std::fs::canonicalize(dir)
                    .unwrap_or_else(|_| dir.to_path_buf())
                    .display()
                    .to_string(),
            ),
            rel_path: id.to_string(),
            status: Some(if has_todo { "active" } else { "stable" }.to_string()),
            last_updated: modified_at(dir),
            progress: todo::progress(&tasks),
            has_readme: has("README.md"),
            has_todo,
            has_agents_info: has("AGENTS.md"),
            markers,
            tasks,
            files: files::scan_files(dir),
        }
    }
}

fn modified_at(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Local>::from(modified).to_rfc3339())
}

/// Assemble a full snapshot from scanned projects and the data directory.
pub fn build_snapshot(projects: ProjectMap, data_dir: &Path, cron_command: &[String]) -> Snapshot {
    Snapshot {
        projects_count: projects.len(),
        projects,
        last_scan: Some(Local::now().to_rfc3339()),
        is_thinking: sources::is_thinking(data_dir),
        dialogue: sources::load_dialogue(&data_dir.join(sources::DIALOGUE_FILE)),
        cron_jobs: sources::load_cron_jobs(cron_command),
    }
}

/// Where a scan wrote its outputs.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub projects: usize,
    pub state_path: PathBuf,
    pub script_path: PathBuf,
}

/// Write `global_state.json` into `data_dir` and the page script to
/// `script_path`.
pub fn write_outputs(snapshot: &Snapshot, data_dir: &Path, script_path: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    let state_path = data_dir.join(STATE_FILE);
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    std::fs::write(&state_path, json)
        .with_context(|| format!("Failed to write {}", state_path.display()))?;

    if let Some(parent) = script_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let script = snapshot::to_script(snapshot).context("Failed to render snapshot script")?;
    std::fs::write(script_path, script)
        .with_context(|| format!("Failed to write {}", script_path.display()))?;
    Ok(state_path)
}

/// Scan the configured workspace and write both snapshot files.
pub fn run(settings: &Settings) -> Result<ScanReport> {
    let root = &settings.workspace_root;
    if !root.is_dir() {
        anyhow::bail!("Workspace root {} is not a directory", root.display());
    }
    info!(root = %root.display(), max_depth = settings.max_depth, "Scanning workspace");

    let projects = Scanner::new(root, settings.max_depth).scan_workspace();
    let snapshot = build_snapshot(projects, &settings.data_dir, &settings.cron_command);
    let state_path = write_outputs(&snapshot, &settings.data_dir, &settings.snapshot_path)?;

    info!(
        projects = snapshot.projects_count,
        state = %state_path.display(),
        script = %settings.snapshot_path.display(),
        "Scan complete"
    );
    Ok(ScanReport {
        projects: snapshot.projects_count,
        state_path,
        script_path: settings.snapshot_path.clone(),
    })
}
