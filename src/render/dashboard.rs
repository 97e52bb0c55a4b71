use std::fmt::Write as _;

use crate::types::{Project, Snapshot};

use super::{escape, format, Container, RenderResult};

/// Containers the dashboard view writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardPanel {
    pub project_count: Container,
    pub active_count: Container,
    pub last_update: Container,
    pub thinking_indicator: Container,
    pub project_list: Container,
}

impl Default for DashboardPanel {
    fn default() -> Self {
        Self {
            project_count: Container::new("project-count").with_tag("span"),
            active_count: Container::new("active-count").with_tag("span"),
            last_update: Container::new("last-update").with_tag("span"),
            thinking_indicator: Container::new("thinking-indicator")
                .with_class("thinking")
                .with_class("hide"),
            project_list: Container::new("project-list").with_class("project-grid"),
        }
    }
}

pub fn render(snapshot: &Snapshot, panel: &mut DashboardPanel) -> RenderResult {
    render_stats(snapshot, panel);

    let scanned = snapshot
        .last_scan
        .as_deref()
        .and_then(format::datetime)
        .unwrap_or_else(|| "Unknown".to_string());
    panel
        .last_update
        .replace(escape(&format!("Last Scan: {scanned}")));

    let indicator = &mut panel.thinking_indicator;
    if snapshot.is_thinking {
        indicator.set_class("hide", false);
        indicator.set_attr("title", "Lumi is thinking...");
    } else {
        indicator.set_class("hide", true);
        indicator.remove_attr("title");
    }

    render_projects(snapshot, &mut panel.project_list)
}

fn render_stats(snapshot: &Snapshot, panel: &mut DashboardPanel) {
    panel
        .project_count
        .replace(snapshot.projects_count.to_string());
    panel
        .active_count
        .replace(snapshot.active_count().to_string());
}

/// Project ids ordered by path depth, shallowest first. Ties keep snapshot order.
pub fn ordered_ids(snapshot: &Snapshot) -> Vec<&str> {
    let mut ids: Vec<&str> = snapshot.projects.ids().collect();
    ids.sort_by_key(|id| id.split('/').count());
    ids
}

fn render_projects(snapshot: &Snapshot, container: &mut Container) -> RenderResult {
    container.clear();
    let mut out = String::new();
    for id in ordered_ids(snapshot) {
        if let Some(project) = snapshot.projects.get(id) {
            write_card(&mut out, project)?;
        }
    }
    container.replace(out);
    Ok(())
}

fn write_card(out: &mut String, project: &Project) -> std::fmt::Result {
    let progress = project.progress();
    let percent = progress.percent();
    let updated = project
        .last_updated
        .as_deref()
        .and_then(format::date)
        .unwrap_or_else(|| "Unknown".to_string());
    let status = escape(project.status());

    write!(
        out,
        r#"<div class="project-card"><div class="project-header"><div class="project-name">{name}</div><span class="badge {status}">{status}</span></div>"#,
        name = escape(&project.name),
    )?;
    write!(
        out,
        r#"<div class="project-meta"><span class="path-text">📂 {}</span><br>Updated: {}</div>"#,
        escape(&project.rel_path),
        escape(&updated)
    )?;
    out.push_str(r#"<div class="markers-list">"#);
    for marker in &project.markers {
        write!(out, r#"<span class="marker-tag">{}</span>"#, escape(marker))?;
    }
    out.push_str("</div>");
    write!(
        out,
        r#"<div class="progress-container"><div class="progress-bar" style="width: {}%"></div></div>"#,
        percent.min(100)
    )?;
    write!(
        out,
        r#"<div class="progress-text">Progress: {progress} ({percent}%)</div></div>"#
    )
}
