use std::fmt::Write as _;

use tracing::warn;

use crate::types::{ProjectFile, Snapshot};

use super::{escape, Container, MarkdownFormatter, RenderResult, Tab};

/// Shown in place of a non-markdown file with no content.
pub const EMPTY_FILE_PLACEHOLDER: &str = "[Empty or Binary File]";

/// Link that re-opens the explorer on `project_id` with `rel_path` previewed.
pub fn file_href(project_id: &str, rel_path: &str) -> String {
    format!(
        "?tab={}&explorer_project={}&file={}",
        Tab::Explorer.id(),
        urlencoding::encode(project_id),
        urlencoding::encode(rel_path)
    )
}

/// List the files of `project_id`, marking `active_file` (a `rel_path`) as the
/// active row. Returns the active file so the caller can preview it.
pub fn render<'s>(
    snapshot: &'s Snapshot,
    project_id: Option<&str>,
    active_file: Option<&str>,
    tree: &mut Container,
) -> Result<Option<&'s ProjectFile>, super::RenderError> {
    tree.clear();

    let Some((id, project)) =
        project_id.and_then(|id| snapshot.projects.get(id).map(|p| (id, p)))
    else {
        return Ok(None);
    };

    let mut out = String::new();
    let mut active = None;
    for file in &project.files {
        let is_active = active.is_none() && Some(file.rel_path.as_str()) == active_file;
        if is_active {
            active = Some(file);
        }
        write!(
            out,
            r#"<a class="file-item{}" href="{}"><i>📄</i> {}</a>"#,
            if is_active { " active" } else { "" },
            escape(&file_href(id, &file.rel_path)),
            escape(&file.rel_path)
        )?;
    }
    tree.replace(out);
    Ok(active)
}

/// The preview pane: a header naming the file and the rendered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub filename: Container,
    pub content: Container,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            filename: Container::new("viewer-filename").with_tag("span"),
            content: Container::new("viewer-content"),
        }
    }
}

impl Viewer {
    pub fn clear(&mut self) {
        self.filename.clear();
        self.content.clear();
        self.content.reset_classes();
    }
}

/// Show `file` in the viewer. Markdown goes through `markdown`; everything
/// else, and markdown the formatter cannot handle, is shown as literal text.
pub fn preview(
    file: &ProjectFile,
    markdown: &dyn MarkdownFormatter,
    viewer: &mut Viewer,
) -> RenderResult {
    viewer.filename.replace(escape(&file.rel_path));
    viewer.content.reset_classes();

    if file.is_markdown() {
        match markdown.to_html(file.content.as_deref().unwrap_or_default()) {
            Ok(html) => {
                viewer.content.set_class("markdown-body", true);
                viewer.content.replace(html);
                return Ok(());
            }
            Err(e) => {
                warn!(file = %file.rel_path, error = %e, "Markdown preview failed, showing raw text");
            }
        }
    }

    let text = file.content().unwrap_or(EMPTY_FILE_PLACEHOLDER);
    viewer
        .content
        .replace(format!("<pre><code>{}</code></pre>", escape(text)));
    Ok(())
}
