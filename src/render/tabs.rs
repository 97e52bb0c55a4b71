use tracing::warn;

/// The five views of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    Kanban,
    Explorer,
    Dialogue,
    Automation,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Kanban,
        Tab::Explorer,
        Tab::Dialogue,
        Tab::Automation,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Kanban => "kanban",
            Tab::Explorer => "explorer",
            Tab::Dialogue => "dialogue",
            Tab::Automation => "automation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "📊 Dashboard",
            Tab::Kanban => "📋 Kanban",
            Tab::Explorer => "📁 Explorer",
            Tab::Dialogue => "💬 Dialogue",
            Tab::Automation => "⏱️ Automation",
        }
    }

    pub fn from_id(id: &str) -> Option<Tab> {
        Tab::ALL.into_iter().find(|t| t.id() == id)
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Tracks the single active tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabController {
    active: Tab,
}

impl Default for TabController {
    fn default() -> Self {
        Self::new(Tab::Dashboard)
    }
}

impl TabController {
    pub fn new(initial: Tab) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    /// Switch to the tab named `id`. Unknown ids leave the state untouched and
    /// return `None`; the caller renders whatever tab is returned.
    pub fn activate(&mut self, id: &str) -> Option<Tab> {
        let Some(tab) = Tab::from_id(id) else {
            warn!(tab = %id, "Ignoring unknown tab");
            return None;
        };
        self.active = tab;
        Some(tab)
    }
}
