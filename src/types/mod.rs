use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use regex::Regex;

mod lenient;

/// The complete read-only picture of a workspace at one point in time.
///
/// Produced by `lumi scan` (or any other tool writing the same shape) and
/// injected into the page as `window.LUMI_DATA`. Renderers only ever borrow it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: ProjectMap,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub projects_count: usize,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub last_scan: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_thinking: bool,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub dialogue: Vec<Message>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub cron_jobs: Vec<ScheduledJob>,
}

impl Snapshot {
    /// Number of projects whose status is exactly `active`.
    pub fn active_count(&self) -> usize {
        self.projects.iter().filter(|(_, p)| p.is_active()).count()
    }
}

/// Projects keyed by id, in the order the snapshot lists them.
///
/// Serialized as a JSON object. Key order carries no meaning beyond being
/// stable within one snapshot, but every view that lists projects follows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectMap(Vec<(String, Project)>);

impl ProjectMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace a project. Replacing keeps the original position.
    pub fn insert(&mut self, id: impl Into<String>, project: Project) {
        let id = id.into();
        match self.0.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => slot.1 = project,
            None => self.0.push((id, project)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.0.iter().find(|(k, _)| k == id).map(|(_, p)| p)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Project)> {
        self.0.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Project)> for ProjectMap {
    fn from_iter<I: IntoIterator<Item = (String, Project)>>(iter: I) -> Self {
        let mut map = ProjectMap::new();
        for (id, project) in iter {
            map.insert(id, project);
        }
        map
    }
}

impl Serialize for ProjectMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, project) in &self.0 {
            map.serialize_entry(id, project)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProjectMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ProjectMapVisitor;

        impl<'de> serde::de::Visitor<'de> for ProjectMapVisitor {
            type Value = ProjectMap;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of project id to project")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut map = ProjectMap::new();
                while let Some((id, value)) = access.next_entry::<String, serde_json::Value>()? {
                    match Project::deserialize(value) {
                        Ok(project) => map.insert(id, project),
                        Err(e) => tracing::warn!(project = %id, error = %e, "Skipping malformed project"),
                    }
                }
                Ok(map)
            }

            fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                while access.next_element::<serde::de::IgnoredAny>()?.is_some() {}
                Ok(ProjectMap::new())
            }

            // `null`, and any other scalar, is treated as "no projects"
            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(ProjectMap::new())
            }

            fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E> {
                Ok(ProjectMap::new())
            }

            fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E> {
                Ok(ProjectMap::new())
            }

            fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E> {
                Ok(ProjectMap::new())
            }

            fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E> {
                Ok(ProjectMap::new())
            }

            fn visit_str<E>(self, _: &str) -> Result<Self::Value, E> {
                Ok(ProjectMap::new())
            }
        }

        deserializer.deserialize_any(ProjectMapVisitor)
    }
}

/// A directory the scanner recognised as a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub rel_path: String,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// `"done/total"` as produced by the scanner
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub markers: Vec<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub has_readme: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub has_todo: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub has_agents_info: bool,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub files: Vec<ProjectFile>,
}

impl Project {
    /// Status badge text. Missing or empty status reads as `stable`.
    pub fn status(&self) -> &str {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("stable")
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }

    pub fn progress(&self) -> Progress {
        self.progress
            .as_deref()
            .map(Progress::parse)
            .unwrap_or_default()
    }
}

/// Parsed `done/total` counter. Anything that is not two decimal integers
/// separated by a slash degrades to `0/0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: u64,
    pub total: u64,
}

impl Progress {
    pub fn parse(raw: &str) -> Self {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| Regex::new(r"^\s*(\d+)/(\d+)\s*$").expect("valid regex"));

        let Some(caps) = re.captures(raw) else {
            return Self::default();
        };
        match (caps[1].parse(), caps[2].parse()) {
            (Ok(done), Ok(total)) => Self { done, total },
            _ => Self::default(),
        }
    }

    /// `round(100 * done / total)`, or 0 when there is nothing to count.
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        ((self.done as f64 / self.total as f64) * 100.0).round() as u64
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

/// A checklist entry parsed from a project's `todo.md`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub phase: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    /// `todo` or `done` in practice; any other value is carried as-is
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Task {
    pub fn has_status(&self, status: &str) -> bool {
        self.status.as_deref() == Some(status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub rel_path: String,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ProjectFile {
    pub fn is_markdown(&self) -> bool {
        self.name.ends_with(".md")
    }

    /// Content, or `None` when it is absent or empty.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// One line of the dialogue log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub role: String,
    /// Trusted markup, inserted verbatim
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub content: String,
    /// ISO-8601 text or epoch milliseconds; anything else is shown as unknown
    #[serde(default)]
    pub timestamp: serde_json::Value,
}

impl Message {
    pub fn speaker(&self) -> Speaker {
        if self.role == "user" {
            Speaker::User
        } else {
            Speaker::Lumi
        }
    }
}

/// Who wrote a message, as far as the dialogue view cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Lumi,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "Sho",
            Speaker::Lumi => "Lumi",
        }
    }
}

/// An automation entry as reported by `openclaw cron list --json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "agentId", default, deserialize_with = "lenient::or_default")]
    pub agent_id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub schedule: Schedule,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub state: Option<JobState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub expr: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub tz: String,
}

/// Run bookkeeping. Every field is optional; a job without state has never run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::epoch_ms", skip_serializing_if = "Option::is_none")]
    pub next_run_at_ms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::epoch_ms", skip_serializing_if = "Option::is_none")]
    pub last_run_at_ms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ScheduledJob {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Unnamed Job")
    }

    pub fn last_status(&self) -> Option<&str> {
        self.state
            .as_ref()
            .and_then(|s| s.last_status.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn status_label(&self) -> &str {
        self.last_status().unwrap_or("IDLE")
    }

    pub fn is_errored(&self) -> bool {
        self.last_status() == Some("error")
    }

    /// Epoch 0 counts as "not scheduled".
    pub fn next_run_at_ms(&self) -> Option<i64> {
        self.state
            .as_ref()
            .and_then(|s| s.next_run_at_ms)
            .filter(|ms| *ms != 0)
    }

    pub fn last_run_at_ms(&self) -> Option<i64> {
        self.state
            .as_ref()
            .and_then(|s| s.last_run_at_ms)
            .filter(|ms| *ms != 0)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state
            .as_ref()
            .and_then(|s| s.last_error.as_deref())
            .filter(|e| !e.is_empty())
    }
}

/// Lumi configuration (global and local). Every field is optional so the
/// layers can be merged; see `config::Settings` for the resolved values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LumiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_command: Option<Vec<String>>,
}
