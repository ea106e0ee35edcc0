use crate::error::Result;
use crate::events::{BoardEvent, EventBus};
use crate::model::{Status, Task, TaskPatch};
use crate::notifications::Notifications;
use crate::store::Store;
use crate::tasks::update_task;

/// Drag state of the board: at most one card is being dragged.
#[derive(Debug, Default)]
pub struct DragDrop {
    dragged: Option<String>,
}

impl DragDrop {
    pub fn new() -> Self {
        DragDrop::default()
    }

    /// Pick up a card.
    pub fn start(&mut self, task_id: impl Into<String>) {
        self.dragged = Some(task_id.into());
    }

    /// Let go of the card without dropping it on a column.
    pub fn cancel(&mut self) {
        self.dragged = None;
    }

    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    /// Drop the dragged card on the column for `status`. The card takes the
    /// column's status. Nothing happens if no card is being dragged or if the
    /// card no longer exists.
    pub fn drop_on(
        &mut self,
        store: &Store,
        events: &mut EventBus,
        notifications: &mut Notifications,
        status: Status,
    ) -> Result<Option<Task>> {
        let task_id = match self.dragged.take() {
            Some(id) => id,
            None => return Ok(None),
        };

        match update_task(store, &task_id, TaskPatch::status(status)) {
            Ok(Some(task)) => {
                tracing::info!(task_id = %task_id, %status, "moved task");
                events.publish(BoardEvent::TaskStatusChanged {
                    task_id,
                    status,
                    task: task.clone(),
                });
                notifications.success(format!("Task moved to {}", status.label()));
                Ok(Some(task))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                tracing::error!(task_id = %task_id, error = %err, "failed to move task");
                notifications.error("Failed to update task status");
                Err(err)
            }
        }
    }
}
