use std::fmt::Write as _;

use crate::types::Snapshot;

use super::{escape, format, Container, RenderResult};

pub const EMPTY_DIALOGUE: &str = "尚無通訊記錄";
pub const UNKNOWN_TIME: &str = "Unknown Time";

/// Attribute the page script reads to keep the log scrolled to the newest entry.
pub const SCROLL_ATTR: &str = "data-scroll";

/// Render the dialogue log oldest first. Message content is trusted markup and
/// is inserted as-is.
pub fn render(snapshot: &Snapshot, container: &mut Container) -> RenderResult {
    container.clear();

    if snapshot.dialogue.is_empty() {
        container.remove_attr(SCROLL_ATTR);
        container.replace(format!(r#"<div class="placeholder-text">{EMPTY_DIALOGUE}</div>"#));
        return Ok(());
    }

    let mut out = String::new();
    for message in &snapshot.dialogue {
        let time = format::time_of(&message.timestamp).unwrap_or_else(|| UNKNOWN_TIME.to_string());
        write!(
            out,
            r#"<div class="message {}"><div class="meta">{} • {}</div><div class="content">{}</div></div>"#,
            escape(&message.role),
            message.speaker().label(),
            escape(&time),
            message.content
        )?;
    }
    container.replace(out);
    container.set_attr(SCROLL_ATTR, "bottom");
    Ok(())
}
