use crate::model::{Status, Task};

/// Something that happened on the board. Views subscribe to these instead of
/// being called by the operations that cause them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    SessionStarted { user_id: String },
    SessionEnded,
    ProjectCreated { project_id: String },
    ProjectSelected { project_id: String },
    TaskCreated { task: Task },
    TaskUpdated { task: Task },
    TaskStatusChanged { task_id: String, status: Status, task: Task },
    TaskDeleted { task_id: String },
}

impl BoardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::SessionStarted { .. } => "sessionStarted",
            BoardEvent::SessionEnded => "sessionEnded",
            BoardEvent::ProjectCreated { .. } => "projectCreated",
            BoardEvent::ProjectSelected { .. } => "projectSelected",
            BoardEvent::TaskCreated { .. } => "taskCreated",
            BoardEvent::TaskUpdated { .. } => "taskUpdated",
            BoardEvent::TaskStatusChanged { .. } => "taskStatusUpdated",
            BoardEvent::TaskDeleted { .. } => "taskDeleted",
        }
    }

    /// Whether the board view of the current project is stale after this.
    pub fn touches_board(&self) -> bool {
        !matches!(self, BoardEvent::SessionEnded | BoardEvent::ProjectCreated { .. })
    }
}

type Subscriber = Box<dyn FnMut(&BoardEvent)>;

/// Synchronous, single-threaded publish/subscribe. Subscribers run in the
/// order they registered, before `publish` returns.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&BoardEvent) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&mut self, event: BoardEvent) {
        tracing::debug!(event = event.name(), subscribers = self.subscribers.len(), "publish");
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }
}
