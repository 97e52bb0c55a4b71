use std::fmt::Write as _;

use crate::types::{ScheduledJob, Snapshot};

use super::{escape, format, Container, RenderResult};

pub const EMPTY_JOBS: &str = "尚無自動化任務";
pub const NEXT_RUN_FALLBACK: &str = "N/A";
pub const LAST_RUN_FALLBACK: &str = "Never";

/// One card per scheduled job, in snapshot order.
pub fn render(snapshot: &Snapshot, container: &mut Container) -> RenderResult {
    container.clear();

    if snapshot.cron_jobs.is_empty() {
        container.replace(format!(r#"<div class="placeholder-text">{EMPTY_JOBS}</div>"#));
        return Ok(());
    }

    let mut out = String::new();
    for job in &snapshot.cron_jobs {
        write_card(&mut out, job)?;
    }
    container.replace(out);
    Ok(())
}

fn write_card(out: &mut String, job: &ScheduledJob) -> std::fmt::Result {
    let next_run = job
        .next_run_at_ms()
        .and_then(format::epoch_ms)
        .unwrap_or_else(|| NEXT_RUN_FALLBACK.to_string());
    let last_run = job
        .last_run_at_ms()
        .and_then(format::epoch_ms)
        .unwrap_or_else(|| LAST_RUN_FALLBACK.to_string());

    let card_class = if job.is_errored() {
        "cron-card error"
    } else {
        "cron-card"
    };
    let status_class = job.last_status().map(escape).unwrap_or_default();

    write!(
        out,
        r#"<div class="{card_class}"><div class="cron-header"><div class="cron-name">{}</div><span class="cron-status {status_class}">{}</span></div>"#,
        escape(job.display_name()),
        escape(job.status_label())
    )?;
    write!(
        out,
        r#"<div class="cron-schedule">🕒 Schedule: {} ({})</div><div class="cron-next">Next Run: {}</div>"#,
        escape(&job.schedule.expr),
        escape(&job.schedule.tz),
        escape(&next_run)
    )?;
    write!(
        out,
        r#"<div class="cron-meta">Last Run: {}<br>Agent: <code>{}</code></div>"#,
        escape(&last_run),
        escape(&job.agent_id)
    )?;
    if let Some(error) = job.last_error() {
        write!(out, r#"<div class="cron-log">Error: {}</div>"#, escape(error))?;
    }
    out.push_str("</div>");
    Ok(())
}
