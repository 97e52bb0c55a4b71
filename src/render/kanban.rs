use std::fmt::Write as _;

use crate::types::{Snapshot, Task};

use super::{escape, Container, RenderResult};

/// Title substrings that mark an open task as being worked on:
/// "implementation" and "development".
pub const IN_PROGRESS_MARKERS: [&str; 2] = ["實作", "開發"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Todo,
    InProgress,
    Done,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Todo, Column::InProgress, Column::Done];

    pub fn id(&self) -> &'static str {
        match self {
            Column::Todo => "todo",
            Column::InProgress => "in-progress",
            Column::Done => "done",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Column::Todo => "To Do",
            Column::InProgress => "In Progress",
            Column::Done => "Done",
        }
    }
}

/// Which column a task belongs to.
///
/// The data only knows `todo` and `done`; "in progress" is inferred from the
/// title of an open task. Status matching is exact, so an unknown or missing
/// status can never land in `done`.
pub fn bucket(task: &Task) -> Column {
    if task.has_status("done") {
        Column::Done
    } else if task.has_status("todo")
        && IN_PROGRESS_MARKERS.iter().any(|m| task.title.contains(m))
    {
        Column::InProgress
    } else {
        Column::Todo
    }
}

/// The three card lists of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub todo: Container,
    pub in_progress: Container,
    pub done: Container,
}

impl Default for Board {
    fn default() -> Self {
        let list = |column: Column| {
            Container::new(format!("col-{}-cards", column.id())).with_class("card-list")
        };
        Self {
            todo: list(Column::Todo),
            in_progress: list(Column::InProgress),
            done: list(Column::Done),
        }
    }
}

impl Board {
    pub fn column(&self, column: Column) -> &Container {
        match column {
            Column::Todo => &self.todo,
            Column::InProgress => &self.in_progress,
            Column::Done => &self.done,
        }
    }

    fn column_mut(&mut self, column: Column) -> &mut Container {
        match column {
            Column::Todo => &mut self.todo,
            Column::InProgress => &mut self.in_progress,
            Column::Done => &mut self.done,
        }
    }
}

/// Rebuild every column for `project_id`. An unknown project leaves the
/// board empty.
pub fn render(snapshot: &Snapshot, project_id: Option<&str>, board: &mut Board) -> RenderResult {
    for column in Column::ALL {
        board.column_mut(column).clear();
    }

    let Some(project) = project_id.and_then(|id| snapshot.projects.get(id)) else {
        return Ok(());
    };

    let mut cards: [String; 3] = Default::default();
    for task in &project.tasks {
        let slot = match bucket(task) {
            Column::Todo => &mut cards[0],
            Column::InProgress => &mut cards[1],
            Column::Done => &mut cards[2],
        };
        write!(
            slot,
            r#"<div class="kanban-card"><div class="phase-tag">{}</div><div class="task-title">{}</div></div>"#,
            escape(&task.phase),
            escape(&task.title)
        )?;
    }

    let [todo, in_progress, done] = cards;
    board.todo.replace(todo);
    board.in_progress.replace(in_progress);
    board.done.replace(done);
    Ok(())
}
