use crate::error::Result;
use crate::filter::TaskFilter;
use crate::model::{Project, Status, Task};
use crate::projects::list_projects_for_user;
use crate::store::Store;

/// One status lane of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub status: Status,
    /// Tasks that pass the current filter.
    pub tasks: Vec<Task>,
    /// Tasks in this status, ignoring the filter.
    pub total: usize,
}

impl Column {
    /// Column heading, e.g. "In Progress (2)".
    pub fn heading(&self) -> String {
        format!("{} ({})", self.status.label(), self.total)
    }
}

/// The board of one project, recomputed from the store on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub project: Project,
    pub columns: Vec<Column>,
}

impl BoardView {
    pub fn column(&self, status: Status) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn visible_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

/// Group a project's tasks into the four columns, applying the filter.
pub fn build_board(project: Project, tasks: &[Task], filter: &TaskFilter) -> BoardView {
    let columns = Status::ALL
        .iter()
        .map(|&status| {
            let in_status = tasks.iter().filter(|t| t.status == status);
            Column {
                status,
                total: in_status.clone().count(),
                tasks: in_status.filter(|t| filter.matches(t)).cloned().collect(),
            }
        })
        .collect();

    BoardView { project, columns }
}

/// A project entry in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project: Project,
    pub task_count: usize,
    pub active: bool,
}

/// The user's projects with their task counts; `current` marks the selected
/// one.
pub fn sidebar(store: &Store, user_id: &str, current: Option<&str>) -> Result<Vec<ProjectSummary>> {
    let tasks = store.tasks()?;
    let summaries = list_projects_for_user(store, user_id)?
        .into_iter()
        .map(|project| ProjectSummary {
            task_count: tasks.iter().filter(|t| t.project_id == project.id).count(),
            active: current == Some(project.id.as_str()),
            project,
        })
        .collect();
    Ok(summaries)
}
