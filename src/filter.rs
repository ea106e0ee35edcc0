use std::time::{Duration, Instant};

use crate::model::{Choice, Priority, Status, Task};

/// Quiet period before a typed search term is applied.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Board filters. The default filter lets every task through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Choice<Status>,
    pub priority: Choice<Priority>,
    pub search: String,
}

impl TaskFilter {
    pub fn is_identity(&self) -> bool {
        self.status == Choice::All && self.priority == Choice::All && self.search.is_empty()
    }

    /// Whether a single task passes. Search is a case-insensitive substring
    /// match on title, description and assignee; absent fields match as
    /// empty text.
    pub fn matches(&self, task: &Task) -> bool {
        if !self.status.matches(&task.status) || !self.priority.matches(&task.priority) {
            return false;
        }

        let term = self.search.to_lowercase();
        if term.is_empty() {
            return true;
        }

        [
            Some(task.title.as_str()),
            task.description.as_deref(),
            task.assignee.as_deref(),
        ]
        .iter()
        .any(|field| field.unwrap_or("").to_lowercase().contains(&term))
    }
}

/// Keep the tasks that pass the filter, preserving order.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    tasks.iter().filter(|t| filter.matches(t)).cloned().collect()
}

/// Holds back rapidly changing input until it has been quiet for `wait`.
/// Every new input restarts the wait. Time is passed in by the caller.
#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Debouncer { wait, pending: None }
    }

    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Release the latest input once the quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let quiet = matches!(
            &self.pending,
            Some((_, at)) if now.saturating_duration_since(*at) >= self.wait
        );
        if quiet {
            self.flush()
        } else {
            None
        }
    }

    /// Release the latest input right away, if there is one.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
