use chrono::Utc;

use crate::error::{BoardError, Result};
use crate::model::{non_blank, NewTask, Task, TaskPatch};
use crate::store::{generate_id, Store};

/// Add a task. Status defaults to `todo` and priority to `medium`.
pub fn create_task(store: &Store, data: NewTask) -> Result<Task> {
    let title = data.title.trim().to_string();
    if title.is_empty() {
        return Err(BoardError::validation("Task title is required"));
    }

    let now = Utc::now();
    let task = Task {
        id: generate_id(),
        project_id: data.project_id,
        title,
        description: non_blank(data.description),
        priority: data.priority.unwrap_or_default(),
        status: data.status.unwrap_or_default(),
        assignee: non_blank(data.assignee),
        due_date: data.due_date,
        created_at: now,
        updated_at: now,
    };

    let mut tasks = store.tasks()?;
    tasks.push(task.clone());
    store.save_tasks(&tasks)?;
    tracing::debug!(task_id = %task.id, project_id = %task.project_id, "created task");
    Ok(task)
}

/// Merge `patch` over the task and refresh its update timestamp. Returns the
/// merged task, or `None` if no task has that id.
pub fn update_task(store: &Store, task_id: &str, patch: TaskPatch) -> Result<Option<Task>> {
    let mut tasks = store.tasks()?;
    let task = match tasks.iter_mut().find(|t| t.id == task_id) {
        Some(task) => task,
        None => {
            tracing::debug!(task_id, "update of unknown task");
            return Ok(None);
        }
    };

    if let Some(title) = patch.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(BoardError::validation("Task title is required"));
        }
        task.title = title;
    }
    if let Some(description) = patch.description {
        task.description = non_blank(Some(description));
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    if let Some(assignee) = patch.assignee {
        task.assignee = non_blank(Some(assignee));
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = due_date;
    }
    task.updated_at = Utc::now();

    let updated = task.clone();
    store.save_tasks(&tasks)?;
    tracing::debug!(task_id, status = %updated.status, "updated task");
    Ok(Some(updated))
}

/// Remove a task. Removing an unknown id does nothing; the return value
/// tells whether a task was removed.
pub fn delete_task(store: &Store, task_id: &str) -> Result<bool> {
    let mut tasks = store.tasks()?;
    let before = tasks.len();
    tasks.retain(|t| t.id != task_id);
    let removed = tasks.len() != before;
    store.save_tasks(&tasks)?;
    tracing::debug!(task_id, removed, "deleted task");
    Ok(removed)
}

/// Tasks of a project, in creation order.
pub fn list_tasks_for_project(store: &Store, project_id: &str) -> Result<Vec<Task>> {
    Ok(store
        .tasks()?
        .into_iter()
        .filter(|t| t.project_id == project_id)
        .collect())
}

pub fn find_task(store: &Store, task_id: &str) -> Result<Option<Task>> {
    Ok(store.tasks()?.into_iter().find(|t| t.id == task_id))
}
