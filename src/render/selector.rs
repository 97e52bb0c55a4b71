use std::fmt::Write as _;

use crate::types::ProjectMap;

use super::{escape, Tab};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
}

/// A project drop-down bound to one view (`kanban` or `explorer`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSelector {
    target: Tab,
    options: Vec<SelectOption>,
    selected: Option<String>,
}

impl ProjectSelector {
    pub fn new(target: Tab) -> Self {
        Self {
            target,
            options: Vec::new(),
            selected: None,
        }
    }

    pub fn target(&self) -> Tab {
        self.target
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Rebuild the options from `projects`, keeping the current selection if
    /// it still exists.
    pub fn sync(&mut self, projects: &ProjectMap) {
        self.options = projects
            .iter()
            .map(|(id, project)| SelectOption {
                id: id.to_string(),
                name: project.name.clone(),
            })
            .collect();

        if let Some(current) = &self.selected {
            if !self.has_option(current) {
                self.selected = None;
            }
        }
    }

    /// Seed the selection carried over from a previous page. It is checked
    /// against the projects on the next `sync`.
    pub fn restore(&mut self, id: Option<&str>) {
        self.selected = id.map(String::from);
    }

    /// Select `id`. Returns false (and falls back to the first option) when
    /// no such option exists.
    pub fn select(&mut self, id: &str) -> bool {
        if self.has_option(id) {
            self.selected = Some(id.to_string());
            true
        } else {
            self.selected = None;
            false
        }
    }

    /// The effective selection: the chosen id, else the first option.
    pub fn selected(&self) -> Option<&str> {
        self.selected
            .as_deref()
            .or_else(|| self.options.first().map(|o| o.id.as_str()))
    }

    fn has_option(&self, id: &str) -> bool {
        self.options.iter().any(|o| o.id == id)
    }

    pub fn to_html(&self) -> Result<String, std::fmt::Error> {
        let selected = self.selected();
        let mut out = String::new();
        write!(
            out,
            r#"<select class="p-select" name="{target}_project" data-target="{target}">"#,
            target = self.target.id()
        )?;
        for option in &self.options {
            let marker = if Some(option.id.as_str()) == selected {
                " selected"
            } else {
                ""
            };
            write!(
                out,
                r#"<option value="{}"{}>{}</option>"#,
                escape(&option.id),
                marker,
                escape(&option.name)
            )?;
        }
        out.push_str("</select>");
        Ok(out)
    }
}
