use chrono::{Duration, Utc};

use crate::error::{BoardError, Result};
use crate::model::{non_blank, today, NewProject, NewTask, Priority, Project, Status, User};
use crate::store::{generate_id, Store};
use crate::tasks::create_task;

/// Add a project. The owner is made a member if the caller left it out.
pub fn create_project(store: &Store, data: NewProject) -> Result<Project> {
    let name = data.name.trim().to_string();
    if name.is_empty() {
        return Err(BoardError::validation("Project name is required"));
    }

    let mut members = data.members;
    if !members.contains(&data.owner_id) {
        members.insert(0, data.owner_id.clone());
    }

    let project = Project {
        id: generate_id(),
        name,
        description: non_blank(data.description),
        owner_id: data.owner_id,
        members,
        created_at: Utc::now(),
    };

    let mut projects = store.projects()?;
    projects.push(project.clone());
    store.save_projects(&projects)?;
    tracing::info!(project_id = %project.id, name = %project.name, "created project");
    Ok(project)
}

/// Projects the user owns or is a member of, in creation order.
pub fn list_projects_for_user(store: &Store, user_id: &str) -> Result<Vec<Project>> {
    Ok(store
        .projects()?
        .into_iter()
        .filter(|p| p.is_visible_to(user_id))
        .collect())
}

pub fn find_project(store: &Store, project_id: &str) -> Result<Option<Project>> {
    Ok(store.projects()?.into_iter().find(|p| p.id == project_id))
}

/// Give a user without projects a starter board with a welcome card, and
/// return the user's projects.
pub fn ensure_default_project(store: &Store, user: &User) -> Result<Vec<Project>> {
    let projects = list_projects_for_user(store, &user.id)?;
    if !projects.is_empty() {
        return Ok(projects);
    }

    let project = create_project(
        store,
        NewProject {
            name: "My First Project".into(),
            description: Some("Welcome to TaskFlow! This is your first project.".into()),
            owner_id: user.id.clone(),
            members: vec![user.id.clone()],
        },
    )?;

    create_task(
        store,
        NewTask {
            project_id: project.id.clone(),
            title: "Welcome to TaskFlow!".into(),
            description: Some(
                "This is your first task. You can move it between columns, edit it, or delete it."
                    .into(),
            ),
            priority: Some(Priority::Medium),
            status: Some(Status::Todo),
            assignee: Some(user.username.clone()),
            due_date: Some(today() + Duration::days(7)),
        },
    )?;

    Ok(vec![project])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::list_tasks_for_project;

    fn new_project(name: &str, owner: &str, members: &[&str]) -> NewProject {
        NewProject {
            name: name.into(),
            description: None,
            owner_id: owner.into(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn user(id: &str) -> User {
        User {
            id: id.into(),
            username: format!("user-{}", id),
            email: format!("{}@example.com", id),
            password: "secret1".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_is_always_a_member() {
        let store = Store::open_in_memory().unwrap();
        let project = create_project(&store, new_project("P1", "u1", &["u2"])).unwrap();
        assert_eq!(project.members, vec!["u1".to_string(), "u2".to_string()]);

        let project = create_project(&store, new_project("P2", "u1", &["u1"])).unwrap();
        assert_eq!(project.members, vec!["u1".to_string()]);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        let err = create_project(&store, new_project("   ", "u1", &[])).unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
        assert!(store.projects().unwrap().is_empty());
    }

    #[test]
    fn test_list_for_user_covers_owner_and_members() {
        let store = Store::open_in_memory().unwrap();
        create_project(&store, new_project("Mine", "u1", &[])).unwrap();
        create_project(&store, new_project("Shared", "u2", &["u1"])).unwrap();
        create_project(&store, new_project("Theirs", "u2", &[])).unwrap();

        let names: Vec<_> = list_projects_for_user(&store, "u1")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Mine", "Shared"]);
        assert!(list_projects_for_user(&store, "u3").unwrap().is_empty());
    }

    #[test]
    fn test_find_project() {
        let store = Store::open_in_memory().unwrap();
        let project = create_project(&store, new_project("P1", "u1", &[])).unwrap();
        assert_eq!(find_project(&store, &project.id).unwrap(), Some(project));
        assert_eq!(find_project(&store, "missing").unwrap(), None);
    }

    #[test]
    fn test_default_project_is_created_once() {
        let store = Store::open_in_memory().unwrap();
        let ana = user("u1");

        let projects = ensure_default_project(&store, &ana).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "My First Project");

        let tasks = list_tasks_for_project(&store, &projects[0].id).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, Status::Todo);
        assert_eq!(tasks[0].assignee.as_deref(), Some("user-u1"));
        assert_eq!(tasks[0].due_date, Some(today() + Duration::days(7)));

        let again = ensure_default_project(&store, &ana).unwrap();
        assert_eq!(again, projects);
        assert_eq!(store.projects().unwrap().len(), 1);
        assert_eq!(store.tasks().unwrap().len(), 1);
    }
}
