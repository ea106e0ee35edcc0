use chrono::{NaiveDate, Utc};

use crate::error::Result;
use crate::model::{NewProject, NewTask, Priority, Status, User};
use crate::projects::create_project;
use crate::store::Store;
use crate::tasks::create_task;

/// Id of the demo account.
pub const DEMO_USER_ID: &str = "admin1";

/// Fill an empty store with a demo account (demo / demo123), one project and
/// three tasks. Does nothing once any user exists. Returns whether it seeded.
pub fn initialize_sample_data(store: &Store) -> Result<bool> {
    if !store.users()?.is_empty() {
        return Ok(false);
    }

    store.save_users(&[User {
        id: DEMO_USER_ID.into(),
        username: "demo".into(),
        email: "demo@taskflow.com".into(),
        password: "demo123".into(),
        created_at: Utc::now(),
    }])?;

    let project = create_project(
        store,
        NewProject {
            name: "Website Redesign".into(),
            description: Some("Complete redesign of company website".into()),
            owner_id: DEMO_USER_ID.into(),
            members: vec![DEMO_USER_ID.into()],
        },
    )?;

    let samples = [
        (
            "Design Homepage",
            "Create new homepage layout and design",
            Priority::High,
            Status::InProgress,
            "John Doe",
            (2024, 2, 15),
        ),
        (
            "Develop Contact Form",
            "Implement responsive contact form with validation",
            Priority::Medium,
            Status::Todo,
            "Jane Smith",
            (2024, 2, 20),
        ),
        (
            "SEO Optimization",
            "Optimize website for search engines",
            Priority::Low,
            Status::Review,
            "Mike Johnson",
            (2024, 2, 25),
        ),
    ];

    for (title, description, priority, status, assignee, (y, m, d)) in samples {
        create_task(
            store,
            NewTask {
                project_id: project.id.clone(),
                title: title.into(),
                description: Some(description.into()),
                priority: Some(priority),
                status: Some(status),
                assignee: Some(assignee.into()),
                due_date: NaiveDate::from_ymd_opt(y, m, d),
            },
        )?;
    }

    tracing::info!("seeded sample data");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{login, register};
    use crate::model::NewUser;
    use crate::tasks::list_tasks_for_project;

    #[test]
    fn test_seeds_demo_board() {
        let store = Store::open_in_memory().unwrap();
        assert!(initialize_sample_data(&store).unwrap());

        let demo = login(&store, "demo", "demo123").unwrap();
        assert_eq!(demo.id, DEMO_USER_ID);

        let projects = store.projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Website Redesign");

        let tasks = list_tasks_for_project(&store, &projects[0].id).unwrap();
        let statuses: Vec<_> = tasks.iter().map(|t| t.status).collect();
        assert_eq!(statuses, vec![Status::InProgress, Status::Todo, Status::Review]);
    }

    #[test]
    fn test_skips_when_users_exist() {
        let store = Store::open_in_memory().unwrap();
        register(
            &store,
            NewUser {
                username: "ana".into(),
                email: "ana@example.com".into(),
                password: "secret1".into(),
            },
        )
        .unwrap();

        assert!(!initialize_sample_data(&store).unwrap());
        assert!(store.projects().unwrap().is_empty());
        assert_eq!(store.users().unwrap().len(), 1);
    }
}
