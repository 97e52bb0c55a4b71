//! The non-project parts of a snapshot: dialogue log, scheduled jobs and the
//! thinking flag.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::types::{Message, ScheduledJob};

pub const DIALOGUE_FILE: &str = "dialogue.jsonl";
pub const THINKING_LOCK: &str = "thinking.lock";

/// Read the JSONL dialogue log. A missing file is an empty log; lines that
/// do not parse are skipped.
pub fn load_dialogue(path: &Path) -> Vec<Message> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        debug!(path = %path.display(), "No dialogue log");
        return Vec::new();
    };
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<Message>(line) {
            Ok(message) => Some(message),
            Err(e) => {
                debug!(error = %e, "Skipping malformed dialogue line");
                None
            }
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct CronListing {
    #[serde(default)]
    jobs: Vec<ScheduledJob>,
}

/// Parse the `{"jobs": [...]}` document a cron listing prints.
pub fn parse_cron_listing(json: &str) -> Result<Vec<ScheduledJob>, serde_json::Error> {
    serde_json::from_str::<CronListing>(json).map(|listing| listing.jobs)
}

/// Run `command` and collect the jobs it lists. Any failure yields no jobs.
pub fn load_cron_jobs(command: &[String]) -> Vec<ScheduledJob> {
    let Some((program, args)) = command.split_first() else {
        return Vec::new();
    };

    let output = match Command::new(program).args(args).output() {
        Ok(output) => output,
        Err(e) => {
            debug!(%program, error = %e, "Cron listing unavailable");
            return Vec::new();
        }
    };
    if !output.status.success() {
        warn!(%program, status = %output.status, "Cron listing failed");
        return Vec::new();
    }

    match parse_cron_listing(&String::from_utf8_lossy(&output.stdout)) {
        Ok(jobs) => jobs,
        Err(e) => {
            warn!(%program, error = %e, "Cron listing is not valid JSON");
            Vec::new()
        }
    }
}

pub fn is_thinking(data_dir: &Path) -> bool {
    data_dir.join(THINKING_LOCK).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_dialogue_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DIALOGUE_FILE);
        fs::write(
            &path,
            "{\"role\":\"user\",\"content\":\"hi\",\"timestamp\":\"2026-01-01T00:00:00\"}\nnot json\n\n[1,2]\n{\"role\":\"assistant\",\"content\":\"yo\"}\n",
        )
        .unwrap();

        let dialogue = load_dialogue(&path);
        assert_eq!(dialogue.len(), 2);
        assert_eq!(dialogue[0].role, "user");
        assert_eq!(dialogue[1].content, "yo");
    }

    #[test]
    fn test_missing_dialogue_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dialogue(&dir.path().join("nope.jsonl")).is_empty());
    }

    #[test]
    fn test_parse_cron_listing() {
        let jobs = parse_cron_listing(
            r#"{"jobs":[{"name":"a","agentId":"lumi","schedule":{"expr":"* * * * *","tz":"UTC"},"enabled":true}]}"#,
        )
        .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].agent_id, "lumi");

        assert!(parse_cron_listing("{}").unwrap().is_empty());
        assert!(parse_cron_listing("nope").is_err());
    }

    #[test]
    fn test_cron_command_failures_are_empty() {
        assert!(load_cron_jobs(&[]).is_empty());
        assert!(load_cron_jobs(&["lumi-definitely-not-a-command".to_string()]).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_cron_command_output() {
        let command = vec![
            "echo".to_string(),
            r#"{"jobs":[{"agentId":"lumi","schedule":{"expr":"@daily","tz":"UTC"}}]}"#.to_string(),
        ];
        let jobs = load_cron_jobs(&command);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].schedule.expr, "@daily");
    }

    #[test]
    fn test_thinking_lock() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_thinking(dir.path()));
        fs::write(dir.path().join(THINKING_LOCK), "").unwrap();
        assert!(is_thinking(dir.path()));
    }
}
