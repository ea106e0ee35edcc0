use prettytable::format::consts::FORMAT_BOX_CHARS;
use prettytable::{Cell, Row, Table};

use crate::app::App;
use crate::board::{BoardView, ProjectSummary};
use crate::cli::Command;
use crate::error::Result;
use crate::model::{NewTask, NewUser, Task, TaskExtra, TaskPatch, today};
use crate::notifications::{Level, Notification};
use crate::utils::{format_date, format_timestamp};

/// Width of a card in a board column.
const CARD_WIDTH: usize = 28;

/// Number of id characters shown on cards.
const SHORT_ID: usize = 8;

/// Perform a command against the board.
pub fn dispatch(app: &mut App, action: Command) -> Result<()> {
    match action {
        Command::Register {
            username,
            email,
            password,
        } => {
            app.register(NewUser {
                username,
                email,
                password,
            })?;
        }
        Command::Login { username, password } => {
            app.login(&username, &password)?;
            print_board(app)?;
        }
        Command::Logout => app.logout()?,
        Command::Whoami => match app.user() {
            Some(user) => println!("{} <{}>", user.username, user.email),
            None => println!("Not logged in."),
        },
        Command::Projects => {
            projects_table(&app.projects()?).printstd();
        }
        Command::NewProject { name, description } => {
            let project = app.create_project(&name, description)?;
            println!("{} {}", short_id(&project.id), project.name);
        }
        Command::Board {
            project,
            status,
            priority,
            search,
        } => {
            if let Some(key) = project {
                app.select_project(&key)?;
            }
            app.set_status_filter(status);
            app.set_priority_filter(priority);
            app.set_search(search.as_deref().unwrap_or(""));
            print_board(app)?;
        }
        Command::Add {
            title,
            project,
            description,
            priority,
            status,
            assignee,
            due,
        } => {
            if let Some(key) = project {
                app.select_project(&key)?;
            }
            let task = app.add_task(NewTask {
                project_id: String::new(),
                title,
                description,
                priority,
                status,
                assignee,
                due_date: due,
            })?;
            println!("{} {}", short_id(&task.id), task.title);
        }
        Command::Edit {
            id,
            title,
            description,
            priority,
            status,
            assignee,
            due,
            no_due,
        } => {
            let id = app.resolve_task_id(&id)?;
            let patch = TaskPatch {
                title,
                description,
                priority,
                status,
                assignee,
                due_date: if no_due { Some(None) } else { due.map(Some) },
            };
            if patch.is_empty() {
                app.notifications_mut().warning("Nothing to change");
                return Ok(());
            }
            let task = app.edit_task(&id, patch)?;
            task_table(&task).printstd();
        }
        Command::Mv { id, status } => {
            let id = app.resolve_task_id(&id)?;
            let task = app.move_task(&id, status)?;
            select_task_project(app, &task)?;
            print_board(app)?;
        }
        Command::Rm { id } => {
            let id = app.resolve_task_id(&id)?;
            let task = app.task(&id)?;
            app.delete_task(&id)?;
            select_task_project(app, &task)?;
            print_board(app)?;
        }
        Command::Show { id } => {
            let id = app.resolve_task_id(&id)?;
            task_table(&app.task(&id)?).printstd();
        }
    }
    Ok(())
}

fn select_task_project(app: &mut App, task: &Task) -> Result<()> {
    app.select_project(&task.project_id)?;
    Ok(())
}

fn print_board(app: &mut App) -> Result<()> {
    if !app.needs_render() {
        return Ok(());
    }
    let view = app.board()?;
    println!("{}", view.project.name);
    board_table(&view).printstd();
    Ok(())
}

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID).unwrap_or(id)
}

/// Render the board: one column per status, one card per cell.
pub fn board_table(view: &BoardView) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_BOX_CHARS);
    table.set_titles(Row::new(
        view.columns.iter().map(|c| Cell::new(&c.heading())).collect(),
    ));

    let depth = view.columns.iter().map(|c| c.tasks.len()).max().unwrap_or(0);
    if depth == 0 {
        table.add_row(Row::new(
            view.columns.iter().map(|_| Cell::new("No tasks")).collect(),
        ));
        return table;
    }

    let today = today();
    for i in 0..depth {
        table.add_row(Row::new(
            view.columns
                .iter()
                .map(|column| match column.tasks.get(i) {
                    Some(task) => Cell::new(&card(task, today)),
                    None if i == 0 => Cell::new("No tasks"),
                    None => Cell::new(""),
                })
                .collect(),
        ));
    }
    table
}

/// Text of a task card.
pub fn card(task: &Task, today: chrono::NaiveDate) -> String {
    let mut lines = vec![
        textwrap::fill(&format!("[{}] {}", short_id(&task.id), task.title), CARD_WIDTH),
        format!(
            "{} | {}",
            task.priority.label(),
            task.assignee.as_deref().unwrap_or("Unassigned")
        ),
    ];
    if let Some(due) = task.due_date {
        let overdue = if task.is_overdue(today) { " (overdue)" } else { "" };
        lines.push(format!("Due {}{}", format_date(Some(due)), overdue));
    }
    lines.join("\n")
}

pub fn projects_table(projects: &[ProjectSummary]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["", "id", "project", "tasks", "description"]);
    if projects.is_empty() {
        table.add_row(row!["", "", "No projects yet", "", ""]);
    }
    for entry in projects {
        table.add_row(row![
            if entry.active { "*" } else { "" },
            short_id(&entry.project.id),
            entry.project.name,
            entry.task_count,
            textwrap::fill(entry.project.description.as_deref().unwrap_or(""), 40)
        ]);
    }
    table
}

pub fn task_table(task: &Task) -> Table {
    let mut table = Table::new();
    table.add_row(row!["id", task.id]);
    table.add_row(row!["title", task.title]);
    table.add_row(row![
        "description",
        textwrap::fill(task.description.as_deref().unwrap_or("No description"), 50)
    ]);
    table.add_row(row!["status", task.status.label()]);
    table.add_row(row!["priority", task.priority.label()]);
    table.add_row(row!["assignee", task.assignee.as_deref().unwrap_or("Unassigned")]);
    table.add_row(row!["due", format_date(task.due_date)]);
    table.add_row(row!["created", format_timestamp(&task.created_at)]);
    table.add_row(row!["updated", format_timestamp(&task.updated_at)]);
    table
}

/// Print notifications; errors and warnings go to stderr.
pub fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        match n.level {
            Level::Error | Level::Warning => eprintln!("[{}] {}", n.level, n.message),
            Level::Success | Level::Info => println!("[{}] {}", n.level, n.message),
        }
    }
}
