use pulldown_cmark::{html, Event, Options, Parser};

use super::RenderError;

/// Converts markdown text into HTML markup for the file previewer.
pub trait MarkdownFormatter: Send + Sync {
    fn to_html(&self, markdown: &str) -> Result<String, RenderError>;
}

/// CommonMark with the GitHub extensions people actually write in notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMark;

impl MarkdownFormatter for CommonMark {
    fn to_html(&self, markdown: &str) -> Result<String, RenderError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        // Raw HTML in workspace files is dropped rather than passed through.
        let parser = Parser::new_ext(markdown, options).filter_map(|event| match event {
            Event::Html(_) | Event::InlineHtml(_) => None,
            other => Some(other),
        });

        let mut out = String::new();
        html::push_html(&mut out, parser);
        Ok(out)
    }
}
