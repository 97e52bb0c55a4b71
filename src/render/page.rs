//! The whole dashboard page: tab state, project selectors and every view's
//! containers, assembled into one HTML document.

use std::fmt::Write as _;

use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::snapshot::SnapshotError;
use crate::types::Snapshot;

use super::dashboard::{self, DashboardPanel};
use super::explorer::{self, Viewer};
use super::kanban::{self, Board, Column};
use super::selector::ProjectSelector;
use super::{automation, dialogue, escape};
use super::{Container, MarkdownFormatter, RenderError, RenderResult, Tab, TabController};

/// UI state carried over from the previous page, as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub tab: Option<String>,
    #[serde(default)]
    pub kanban_project: Option<String>,
    #[serde(default)]
    pub explorer_project: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
}

pub struct Page<'a> {
    markdown: &'a dyn MarkdownFormatter,
    snapshot: Option<&'a Snapshot>,
    load_error: Option<String>,
    tabs: TabController,
    kanban_selector: ProjectSelector,
    explorer_selector: ProjectSelector,
    active_file: Option<String>,
    dashboard: DashboardPanel,
    board: Board,
    file_tree: Container,
    viewer: Viewer,
    chat: Container,
    cron: Container,
}

impl<'a> Page<'a> {
    pub fn new(markdown: &'a dyn MarkdownFormatter) -> Self {
        Self {
            markdown,
            snapshot: None,
            load_error: None,
            tabs: TabController::default(),
            kanban_selector: ProjectSelector::new(Tab::Kanban),
            explorer_selector: ProjectSelector::new(Tab::Explorer),
            active_file: None,
            dashboard: DashboardPanel::default(),
            board: Board::default(),
            file_tree: Container::new("file-tree").with_class("file-tree"),
            viewer: Viewer::default(),
            chat: Container::new("chat-messages").with_class("chat-messages"),
            cron: Container::new("cron-list").with_class("cron-list"),
        }
    }

    /// Build a page the way a browser would see it after following a link:
    /// restore the prior UI state, then load the snapshot.
    pub fn build(
        markdown: &'a dyn MarkdownFormatter,
        snapshot: Result<&'a Snapshot, &SnapshotError>,
        request: &PageRequest,
    ) -> Self {
        let mut page = Page::new(markdown);
        page.restore(request);
        page.load(snapshot);
        page
    }

    /// Apply carried-over state without rendering anything.
    pub fn restore(&mut self, request: &PageRequest) {
        if let Some(tab) = request.tab.as_deref() {
            let _ = self.tabs.activate(tab);
        }
        self.kanban_selector.restore(request.kanban_project.as_deref());
        self.explorer_selector.restore(request.explorer_project.as_deref());
        self.active_file = request.file.clone();
    }

    /// Read the snapshot and render the dashboard plus the active tab.
    ///
    /// A missing snapshot is logged and leaves the dashboard unrendered; the
    /// rest of the page still works.
    pub fn load(&mut self, snapshot: Result<&'a Snapshot, &SnapshotError>) {
        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Failed to load global state");
                self.snapshot = None;
                self.load_error = Some(e.to_string());
                return;
            }
        };
        self.snapshot = Some(snapshot);
        self.load_error = None;

        self.render_tab(Tab::Dashboard);
        self.kanban_selector.sync(&snapshot.projects);
        self.explorer_selector.sync(&snapshot.projects);

        let active = self.tabs.active();
        if active != Tab::Dashboard {
            self.render_tab(active);
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.tabs.active()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Tab click: switch and render only that tab. Unknown ids are ignored.
    pub fn activate(&mut self, id: &str) -> Option<Tab> {
        let tab = self.tabs.activate(id)?;
        self.render_tab(tab);
        Some(tab)
    }

    /// Selector change: re-render only the view bound to `target`.
    pub fn select_project(&mut self, target: Tab, id: &str) {
        let selector = match target {
            Tab::Kanban => &mut self.kanban_selector,
            Tab::Explorer => &mut self.explorer_selector,
            other => {
                warn!(target = %other, "No project selector bound to this view");
                return;
            }
        };
        if !selector.select(id) {
            debug!(project = %id, target = %target, "Unknown project, using default");
        }
        if target == Tab::Explorer {
            self.active_file = None;
        }
        self.render_tab(target);
    }

    /// File click in the explorer.
    pub fn open_file(&mut self, rel_path: &str) {
        self.active_file = Some(rel_path.to_string());
        self.render_tab(Tab::Explorer);
    }

    /// Run exactly the renderer for `tab`. Failures are logged and leave that
    /// view empty; they never reach the caller.
    pub fn render_tab(&mut self, tab: Tab) {
        let result = match tab {
            Tab::Dashboard => self.render_dashboard(),
            Tab::Kanban => self.render_kanban(),
            Tab::Explorer => self.render_explorer(),
            Tab::Dialogue => self.render_dialogue(),
            Tab::Automation => self.render_automation(),
        };
        if let Err(e) = result {
            error!(view = %tab, error = %e, "View render failed");
            self.clear_view(tab);
        }
    }

    fn snapshot(&self) -> Result<&'a Snapshot, RenderError> {
        self.snapshot.ok_or(RenderError::NoSnapshot)
    }

    fn render_dashboard(&mut self) -> RenderResult {
        let snapshot = self.snapshot()?;
        dashboard::render(snapshot, &mut self.dashboard)
    }

    fn render_kanban(&mut self) -> RenderResult {
        let snapshot = self.snapshot()?;
        kanban::render(snapshot, self.kanban_selector.selected(), &mut self.board)
    }

    fn render_explorer(&mut self) -> RenderResult {
        let snapshot = self.snapshot()?;
        let active = explorer::render(
            snapshot,
            self.explorer_selector.selected(),
            self.active_file.as_deref(),
            &mut self.file_tree,
        )?;
        match active {
            Some(file) => explorer::preview(file, self.markdown, &mut self.viewer),
            None => {
                self.viewer.clear();
                Ok(())
            }
        }
    }

    fn render_dialogue(&mut self) -> RenderResult {
        let snapshot = self.snapshot()?;
        dialogue::render(snapshot, &mut self.chat)
    }

    fn render_automation(&mut self) -> RenderResult {
        let snapshot = self.snapshot()?;
        automation::render(snapshot, &mut self.cron)
    }

    fn clear_view(&mut self, tab: Tab) {
        match tab {
            Tab::Dashboard => self.dashboard.project_list.clear(),
            Tab::Kanban => self.board = Board::default(),
            Tab::Explorer => {
                self.file_tree.clear();
                self.viewer.clear();
            }
            Tab::Dialogue => self.chat.clear(),
            Tab::Automation => self.cron.clear(),
        }
    }

    pub fn dashboard(&self) -> &DashboardPanel {
        &self.dashboard
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn file_tree(&self) -> &Container {
        &self.file_tree
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn chat(&self) -> &Container {
        &self.chat
    }

    pub fn cron(&self) -> &Container {
        &self.cron
    }

    pub fn selector(&self, target: Tab) -> Option<&ProjectSelector> {
        match target {
            Tab::Kanban => Some(&self.kanban_selector),
            Tab::Explorer => Some(&self.explorer_selector),
            _ => None,
        }
    }

    /// The current UI state, for links that should preserve it.
    pub fn request_for(&self, tab: Tab) -> PageRequest {
        PageRequest {
            tab: Some(tab.id().to_string()),
            kanban_project: self.kanban_selector.selected().map(String::from),
            explorer_project: self.explorer_selector.selected().map(String::from),
            file: self.active_file.clone(),
        }
    }

    fn href(&self, tab: Tab) -> String {
        let request = self.request_for(tab);
        let mut href = format!("?tab={}", tab.id());
        let params = [
            ("kanban_project", request.kanban_project),
            ("explorer_project", request.explorer_project),
            ("file", request.file),
        ];
        for (name, value) in params {
            if let Some(value) = value {
                href.push_str(&format!("&{name}={}", urlencoding::encode(&value)));
            }
        }
        href
    }

    /// The full HTML document.
    pub fn to_html(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str(concat!(
            "<!DOCTYPE html>\n<html lang=\"zh-Hant\">\n<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>Lumi · Workspace</title>\n",
            "<link rel=\"stylesheet\" href=\"/style.css\">\n",
            "</head>\n<body>\n",
        ));
        write!(
            out,
            "<header class=\"topbar\"><div class=\"brand\">🌙 Lumi {}</div>{}</header>\n",
            self.dashboard.thinking_indicator.outer_html(),
            self.dashboard.last_update.outer_html()
        )?;

        out.push_str("<nav class=\"nav\">");
        for tab in Tab::ALL {
            write!(
                out,
                r#"<a class="nav-btn{}" data-tab="{}" href="{}">{}</a>"#,
                if self.tabs.is_active(tab) { " active" } else { "" },
                tab.id(),
                escape(&self.href(tab)),
                tab.label()
            )?;
        }
        out.push_str("</nav>\n<main>\n");

        for tab in Tab::ALL {
            out.push_str(&self.view_html(tab)?);
            out.push('\n');
        }

        out.push_str("</main>\n<script src=\"/app.js\"></script>\n</body>\n</html>\n");
        Ok(out)
    }

    /// One tab's content pane.
    pub fn view_html(&self, tab: Tab) -> Result<String, RenderError> {
        let mut out = String::new();
        write!(
            out,
            r#"<section id="tab-{}" class="tab-content{}">"#,
            tab.id(),
            if self.tabs.is_active(tab) { " active" } else { "" }
        )?;

        match tab {
            Tab::Dashboard => {
                if let Some(e) = &self.load_error {
                    write!(out, r#"<div class="load-error">{}</div>"#, escape(e))?;
                }
                write!(
                    out,
                    r#"<div class="stats"><div class="stat-card">Projects <strong>{}</strong></div><div class="stat-card">Active <strong>{}</strong></div></div>"#,
                    self.dashboard.project_count.outer_html(),
                    self.dashboard.active_count.outer_html()
                )?;
                out.push_str(&self.dashboard.project_list.outer_html());
            }
            Tab::Kanban => {
                out.push_str(&self.selector_form(&self.kanban_selector)?);
                out.push_str(r#"<div class="kanban-board">"#);
                for column in Column::ALL {
                    write!(
                        out,
                        r#"<div class="kanban-col" id="col-{}"><h3>{}</h3>{}</div>"#,
                        column.id(),
                        column.title(),
                        self.board.column(column).outer_html()
                    )?;
                }
                out.push_str("</div>");
            }
            Tab::Explorer => {
                out.push_str(&self.selector_form(&self.explorer_selector)?);
                write!(
                    out,
                    r#"<div class="explorer">{}<div class="viewer"><div class="viewer-header">{}</div>{}</div></div>"#,
                    self.file_tree.outer_html(),
                    self.viewer.filename.outer_html(),
                    self.viewer.content.outer_html()
                )?;
            }
            Tab::Dialogue => out.push_str(&self.chat.outer_html()),
            Tab::Automation => out.push_str(&self.cron.outer_html()),
        }

        out.push_str("</section>");
        Ok(out)
    }

    /// A GET form around a selector so a change reloads with the new project
    /// while the other selector keeps its value.
    fn selector_form(&self, selector: &ProjectSelector) -> Result<String, RenderError> {
        let target = selector.target();
        let mut out = String::new();
        write!(
            out,
            r#"<form class="toolbar" method="get"><input type="hidden" name="tab" value="{}">"#,
            target.id()
        )?;
        for other in [&self.kanban_selector, &self.explorer_selector] {
            if other.target() == target {
                continue;
            }
            if let Some(id) = other.selected() {
                write!(
                    out,
                    r#"<input type="hidden" name="{}_project" value="{}">"#,
                    other.target().id(),
                    escape(id)
                )?;
            }
        }
        if target != Tab::Explorer {
            if let Some(file) = &self.active_file {
                write!(out, r#"<input type="hidden" name="file" value="{}">"#, escape(file))?;
            }
        }
        out.push_str(&selector.to_html()?);
        out.push_str("</form>");
        Ok(out)
    }
}
