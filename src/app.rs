use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::auth;
use crate::board::{build_board, sidebar, BoardView, ProjectSummary};
use crate::config::Config;
use crate::dragdrop::DragDrop;
use crate::error::{BoardError, Result};
use crate::events::{BoardEvent, EventBus};
use crate::filter::{Debouncer, TaskFilter};
use crate::model::{Choice, NewProject, NewTask, NewUser, Priority, Project, Status, Task, TaskPatch, User};
use crate::notifications::{Notification, Notifications};
use crate::projects::{create_project, ensure_default_project, find_project, list_projects_for_user};
use crate::seed::initialize_sample_data;
use crate::store::Store;
use crate::tasks::{create_task, delete_task, find_task, list_tasks_for_project, update_task};

/// Shortest task id prefix accepted on the command line.
pub const MIN_ID_PREFIX: usize = 4;

/// The board controller. Turns user intents into store operations, publishes
/// what happened, and derives fresh view models from the store.
pub struct App {
    store: Store,
    events: EventBus,
    notifications: Notifications,
    drag: DragDrop,
    filter: TaskFilter,
    search: Debouncer<String>,
    user: Option<User>,
    project_id: Option<String>,
    stale: Rc<Cell<bool>>,
}

impl App {
    /// Build the controller over a store, seeding sample data into an empty
    /// store and restoring a persisted session.
    pub fn new(store: Store, config: &Config) -> Result<App> {
        if config.seed_sample_data {
            initialize_sample_data(&store)?;
        }

        let stale = Rc::new(Cell::new(true));
        let mut events = EventBus::new();
        let flag = Rc::clone(&stale);
        events.subscribe(move |event| {
            if event.touches_board() {
                flag.set(true);
            }
        });

        let user = auth::session_user(&store)?;
        if let Some(user) = &user {
            tracing::debug!(user_id = %user.id, "restored session");
        }

        Ok(App {
            store,
            events,
            notifications: Notifications::new(config.notification_duration),
            drag: DragDrop::new(),
            filter: TaskFilter::default(),
            search: Debouncer::new(config.search_debounce),
            user,
            project_id: None,
            stale,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Hand over the notifications that are still up.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.expire(Instant::now());
        self.notifications.drain()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> Result<&User> {
        self.user.as_ref().ok_or(BoardError::NotLoggedIn)
    }

    pub fn register(&mut self, data: NewUser) -> Result<User> {
        let user = auth::register(&self.store, data)?;
        self.notifications
            .success("Account created successfully! Please login.");
        Ok(user)
    }

    /// Log in and open the user's first project, creating a starter project
    /// for users who have none.
    pub fn login(&mut self, username: &str, password: &str) -> Result<User> {
        let user = auth::login(&self.store, username, password)?;
        let projects = ensure_default_project(&self.store, &user)?;

        self.user = Some(user.clone());
        self.events.publish(BoardEvent::SessionStarted {
            user_id: user.id.clone(),
        });
        if let Some(first) = projects.first() {
            self.open_project(first.id.clone());
        }
        self.notifications
            .success(format!("Welcome back, {}!", user.username));
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        auth::logout(&self.store)?;
        self.user = None;
        self.project_id = None;
        self.events.publish(BoardEvent::SessionEnded);
        self.notifications.info("Logged out successfully");
        Ok(())
    }

    /// Sidebar entries for the logged in user.
    pub fn projects(&self) -> Result<Vec<ProjectSummary>> {
        let user = self.require_user()?;
        sidebar(&self.store, &user.id, self.project_id.as_deref())
    }

    pub fn create_project(&mut self, name: &str, description: Option<String>) -> Result<Project> {
        let owner_id = self.require_user()?.id.clone();
        let project = create_project(
            &self.store,
            NewProject {
                name: name.to_string(),
                description,
                owner_id: owner_id.clone(),
                members: vec![owner_id],
            },
        )?;
        self.events.publish(BoardEvent::ProjectCreated {
            project_id: project.id.clone(),
        });
        self.notifications
            .success(format!("Project \"{}\" created!", project.name));
        Ok(project)
    }

    /// Open a project by id or by name among the user's projects.
    pub fn select_project(&mut self, key: &str) -> Result<Project> {
        let user = self.require_user()?;
        let projects = list_projects_for_user(&self.store, &user.id)?;
        let project = projects
            .iter()
            .find(|p| p.id == key)
            .or_else(|| projects.iter().find(|p| p.name == key))
            .cloned()
            .ok_or_else(|| BoardError::ProjectNotFound(key.to_string()))?;

        self.open_project(project.id.clone());
        Ok(project)
    }

    /// The open project, falling back to the user's first project.
    pub fn current_project(&mut self) -> Result<Project> {
        let user = self.require_user()?.clone();
        if let Some(id) = &self.project_id {
            if let Some(project) = find_project(&self.store, id)? {
                return Ok(project);
            }
        }

        let project = ensure_default_project(&self.store, &user)?
            .into_iter()
            .next()
            .ok_or_else(|| BoardError::validation("Please select a project first"))?;
        self.open_project(project.id.clone());
        Ok(project)
    }

    fn open_project(&mut self, project_id: String) {
        self.project_id = Some(project_id.clone());
        self.events.publish(BoardEvent::ProjectSelected { project_id });
    }

    /// Add a task to the open project.
    pub fn add_task(&mut self, data: NewTask) -> Result<Task> {
        let project = self.current_project()?;
        let task = create_task(
            &self.store,
            NewTask {
                project_id: project.id,
                ..data
            },
        )?;
        self.events.publish(BoardEvent::TaskCreated { task: task.clone() });
        self.notifications.success("Task created successfully!");
        Ok(task)
    }

    pub fn edit_task(&mut self, task_id: &str, patch: TaskPatch) -> Result<Task> {
        self.task(task_id)?;
        let task = update_task(&self.store, task_id, patch)?
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
        self.events.publish(BoardEvent::TaskUpdated { task: task.clone() });
        self.notifications.success("Task updated successfully!");
        Ok(task)
    }

    /// Move a card to another column, as a drag and drop would.
    pub fn move_task(&mut self, task_id: &str, status: Status) -> Result<Task> {
        self.task(task_id)?;
        self.drag.start(task_id);
        self.drag
            .drop_on(&self.store, &mut self.events, &mut self.notifications, status)?
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))
    }

    /// Delete a task. Returns false if the user has no such task.
    pub fn delete_task(&mut self, task_id: &str) -> Result<bool> {
        match self.task(task_id) {
            Ok(_) => {}
            Err(BoardError::TaskNotFound(_)) => return Ok(false),
            Err(err) => return Err(err),
        }
        let removed = delete_task(&self.store, task_id)?;
        if removed {
            self.events.publish(BoardEvent::TaskDeleted {
                task_id: task_id.to_string(),
            });
            self.notifications.info("Task deleted");
        }
        Ok(removed)
    }

    /// A task on one of the user's projects. Tasks of other users' projects
    /// are reported as not found.
    pub fn task(&self, task_id: &str) -> Result<Task> {
        let visible = self.visible_project_ids()?;
        find_task(&self.store, task_id)?
            .filter(|t| visible.contains(&t.project_id))
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))
    }

    fn visible_project_ids(&self) -> Result<Vec<String>> {
        let user = self.require_user()?;
        Ok(list_projects_for_user(&self.store, &user.id)?
            .into_iter()
            .map(|p| p.id)
            .collect())
    }

    /// Resolve a full task id from a unique prefix of at least
    /// `MIN_ID_PREFIX` characters, among the user's tasks.
    pub fn resolve_task_id(&self, prefix: &str) -> Result<String> {
        let prefix = prefix.trim();
        let visible = self.visible_project_ids()?;
        let tasks: Vec<Task> = self
            .store
            .tasks()?
            .into_iter()
            .filter(|t| visible.contains(&t.project_id))
            .collect();
        if let Some(task) = tasks.iter().find(|t| t.id == prefix) {
            return Ok(task.id.clone());
        }
        if prefix.len() < MIN_ID_PREFIX {
            return Err(BoardError::TaskNotFound(prefix.to_string()));
        }

        let mut matches = tasks.iter().filter(|t| t.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Ok(task.id.clone()),
            (Some(_), Some(_)) => Err(BoardError::validation(format!(
                "Task id '{}' is ambiguous",
                prefix
            ))),
            _ => Err(BoardError::TaskNotFound(prefix.to_string())),
        }
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn set_status_filter(&mut self, status: Choice<Status>) {
        self.filter.status = status;
        self.stale.set(true);
    }

    pub fn set_priority_filter(&mut self, priority: Choice<Priority>) {
        self.filter.priority = priority;
        self.stale.set(true);
    }

    /// Apply a search term right away.
    pub fn set_search(&mut self, term: &str) {
        self.search.flush();
        self.filter.search = term.to_string();
        self.stale.set(true);
    }

    /// Record a keystroke in the search box; the term applies on a later
    /// `tick` once typing has paused.
    pub fn type_search(&mut self, term: &str, now: Instant) {
        self.search.input(term.to_string(), now);
    }

    /// Apply a debounced search term if its quiet period is over. Returns
    /// whether the filter changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notifications.expire(now);
        match self.search.poll(now) {
            Some(term) if term != self.filter.search => {
                self.filter.search = term;
                self.stale.set(true);
                true
            }
            _ => false,
        }
    }

    /// Whether something changed since the board was last built.
    pub fn needs_render(&self) -> bool {
        self.stale.get()
    }

    /// Build the board of the open project from the current store state.
    pub fn board(&mut self) -> Result<BoardView> {
        let project = self.current_project()?;
        let tasks = list_tasks_for_project(&self.store, &project.id)?;
        let view = build_board(project, &tasks, &self.filter);
        self.stale.set(false);
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app() -> App {
        let store = Store::open_in_memory().unwrap();
        let config = Config {
            seed_sample_data: false,
            ..Config::default()
        };
        App::new(store, &config).unwrap()
    }

    fn logged_in() -> App {
        let mut app = app();
        app.register(NewUser {
            username: "ana".into(),
            email: "ana@example.com".into(),
            password: "secret1".into(),
        })
        .unwrap();
        app.login("ana", "secret1").unwrap();
        app.drain_notifications();
        app
    }

    fn titled(title: &str, status: Status) -> NewTask {
        NewTask {
            title: title.into(),
            status: Some(status),
            ..NewTask::default()
        }
    }

    #[test]
    fn test_commands_need_a_session() {
        let mut app = app();
        assert!(matches!(app.projects(), Err(BoardError::NotLoggedIn)));
        assert!(matches!(app.board(), Err(BoardError::NotLoggedIn)));
        assert!(matches!(
            app.add_task(titled("A", Status::Todo)),
            Err(BoardError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_first_login_opens_starter_project() {
        let mut app = logged_in();
        let board = app.board().unwrap();
        assert_eq!(board.project.name, "My First Project");
        assert_eq!(board.column(Status::Todo).unwrap().tasks.len(), 1);
    }

    #[test]
    fn test_seeded_store_logs_in_demo() {
        let store = Store::open_in_memory().unwrap();
        let mut app = App::new(store, &Config::default()).unwrap();
        app.login("demo", "demo123").unwrap();
        let board = app.board().unwrap();
        assert_eq!(board.project.name, "Website Redesign");
        assert_eq!(board.visible_count(), 3);
    }

    #[test]
    fn test_drag_scenario() {
        let mut app = logged_in();
        let project = app.create_project("P1", None).unwrap();
        app.select_project("P1").unwrap();
        let a = app.add_task(titled("A", Status::Todo)).unwrap();
        let b = app.add_task(titled("B", Status::InProgress)).unwrap();

        let moved = app.move_task(&b.id, Status::Done).unwrap();
        assert_eq!(moved.status, Status::Done);

        let tasks = list_tasks_for_project(app.store(), &project.id).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0], a);
        assert_eq!(tasks[1].id, b.id);
        assert_eq!(tasks[1].status, Status::Done);

        let messages: Vec<_> = app
            .drain_notifications()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert!(messages.contains(&"Task moved to Done".to_string()));
    }

    #[test]
    fn test_missing_tasks_are_reported() {
        let mut app = logged_in();
        assert!(matches!(
            app.move_task("missing", Status::Done),
            Err(BoardError::TaskNotFound(_))
        ));
        assert!(matches!(
            app.edit_task("missing", TaskPatch::status(Status::Done)),
            Err(BoardError::TaskNotFound(_))
        ));
        assert!(!app.delete_task("missing").unwrap());
    }

    #[test]
    fn test_events_mark_board_stale() {
        let mut app = logged_in();
        app.board().unwrap();
        assert!(!app.needs_render());

        let task = app.add_task(titled("A", Status::Todo)).unwrap();
        assert!(app.needs_render());
        app.board().unwrap();

        app.delete_task(&task.id).unwrap();
        assert!(app.needs_render());
    }

    #[test]
    fn test_debounced_search_applies_after_pause() {
        let mut app = logged_in();
        app.add_task(titled("Write docs", Status::Review)).unwrap();
        app.board().unwrap();

        let start = Instant::now();
        app.type_search("wri", start);
        app.type_search("write", start + Duration::from_millis(100));
        assert!(!app.tick(start + Duration::from_millis(250)));
        assert_eq!(app.filter().search, "");

        assert!(app.tick(start + Duration::from_millis(400)));
        assert_eq!(app.filter().search, "write");
        assert!(app.needs_render());

        let board = app.board().unwrap();
        assert_eq!(board.visible_count(), 1);
        assert_eq!(board.column(Status::Review).unwrap().tasks[0].title, "Write docs");
    }

    #[test]
    fn test_resolve_task_id_by_prefix() {
        let mut app = logged_in();
        let task = app.add_task(titled("A", Status::Todo)).unwrap();

        assert_eq!(app.resolve_task_id(&task.id).unwrap(), task.id);
        assert_eq!(app.resolve_task_id(&task.id[..8]).unwrap(), task.id);
        assert!(matches!(
            app.resolve_task_id(&task.id[..2]),
            Err(BoardError::TaskNotFound(_))
        ));
        assert!(matches!(
            app.resolve_task_id("zzzzzzzz"),
            Err(BoardError::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_tasks_of_other_users_are_out_of_reach() {
        let store = Store::open_in_memory().unwrap();
        let mut app = App::new(store, &Config::default()).unwrap();
        app.login("demo", "demo123").unwrap();
        let seo = app
            .board()
            .unwrap()
            .column(Status::Review)
            .unwrap()
            .tasks[0]
            .clone();
        app.logout().unwrap();

        app.register(NewUser {
            username: "eve".into(),
            email: "eve@example.com".into(),
            password: "secret1".into(),
        })
        .unwrap();
        app.login("eve", "secret1").unwrap();

        assert!(matches!(
            app.resolve_task_id(&seo.id[..8]),
            Err(BoardError::TaskNotFound(_))
        ));
        assert!(matches!(app.task(&seo.id), Err(BoardError::TaskNotFound(_))));
        assert!(matches!(
            app.move_task(&seo.id, Status::Done),
            Err(BoardError::TaskNotFound(_))
        ));
        assert!(matches!(
            app.edit_task(&seo.id, TaskPatch::status(Status::Done)),
            Err(BoardError::TaskNotFound(_))
        ));
        assert!(!app.delete_task(&seo.id).unwrap());

        let untouched = find_task(app.store(), &seo.id).unwrap().unwrap();
        assert_eq!(untouched, seo);
        assert_eq!(app.store().tasks().unwrap().len(), 4);
    }

    #[test]
    fn test_subscribed_view_sees_board_events() {
        use std::cell::RefCell;

        let mut app = logged_in();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        app.events_mut()
            .subscribe(move |e| sink.borrow_mut().push(e.name()));

        let task = app.add_task(titled("A", Status::Todo)).unwrap();
        app.move_task(&task.id, Status::Review).unwrap();
        app.delete_task(&task.id).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec!["taskCreated", "taskStatusUpdated", "taskDeleted"]
        );
    }

    #[test]
    fn test_logout_forgets_project() {
        let mut app = logged_in();
        app.logout().unwrap();
        assert!(app.user().is_none());
        assert!(matches!(app.board(), Err(BoardError::NotLoggedIn)));
        assert_eq!(auth::session_user(app.store()).unwrap(), None);
    }
}
