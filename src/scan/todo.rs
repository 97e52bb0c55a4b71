use crate::types::Task;

pub const DEFAULT_PHASE: &str = "General";

/// Parse a `todo.md` checklist.
///
/// `## Heading` lines set the phase for the items below them; `- [ ]` and
/// `- [x]` lines become tasks. Everything else is ignored.
pub fn parse_tasks(text: &str) -> Vec<Task> {
    let mut tasks = Vec::new();
    let mut phase = DEFAULT_PHASE.to_string();

    for line in text.lines().map(str::trim) {
        if let Some(heading) = line.strip_prefix("## ") {
            phase = heading.trim().to_string();
        } else if line.starts_with("- [") {
            let status = if line.to_lowercase().contains("[x]") {
                "done"
            } else {
                "todo"
            };
            // skip the "- [ ] " prefix
            let title: String = line.chars().skip(6).collect();
            tasks.push(Task {
                phase: phase.clone(),
                title: title.trim().to_string(),
                status: Some(status.to_string()),
            });
        }
    }
    tasks
}

/// `"done/total"`, or `None` for an empty list.
pub fn progress(tasks: &[Task]) -> Option<String> {
    if tasks.is_empty() {
        return None;
    }
    let done = tasks.iter().filter(|t| t.has_status("done")).count();
    Some(format!("{}/{}", done, tasks.len()))
}
