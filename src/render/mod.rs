//! Server-side view rendering.
//!
//! Every view is a plain function of the snapshot plus the containers it is
//! bound to. A render always clears and rebuilds its containers, so rendering
//! twice from the same snapshot yields identical markup.

pub mod automation;
pub mod dashboard;
pub mod dialogue;
pub mod explorer;
pub mod format;
pub mod kanban;
pub mod markdown;
pub mod page;
pub mod selector;
pub mod tabs;

pub use markdown::{CommonMark, MarkdownFormatter};
pub use page::{Page, PageRequest};
pub use tabs::{Tab, TabController};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no snapshot loaded")]
    NoSnapshot,

    #[error("markdown conversion failed: {0}")]
    Markdown(String),

    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

pub type RenderResult = Result<(), RenderError>;

/// A named element whose contents a renderer owns and replaces wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: String,
    tag: &'static str,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    inner: String,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: "div",
            classes: Vec::new(),
            attrs: Vec::new(),
            inner: String::new(),
        }
    }

    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.set_class(class, true);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn inner_html(&self) -> &str {
        &self.inner
    }

    pub fn replace(&mut self, html: String) {
        self.inner = html;
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn set_class(&mut self, class: &str, on: bool) {
        let present = self.has_class(class);
        if on && !present {
            self.classes.push(class.to_string());
        } else if !on && present {
            self.classes.retain(|c| c != class);
        }
    }

    /// Drop every class, e.g. before the previewer picks a presentation.
    pub fn reset_classes(&mut self) {
        self.classes.clear();
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }

    /// The element itself, with its current contents.
    pub fn outer_html(&self) -> String {
        let mut out = format!("<{}", self.tag);
        if !self.id.is_empty() {
            out.push_str(&format!(" id=\"{}\"", escape(&self.id)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape(&self.classes.join(" "))));
        }
        for (name, value) in &self.attrs {
            out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }
        out.push('>');
        out.push_str(&self.inner);
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

/// Escape text for use in element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
