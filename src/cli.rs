use chrono::NaiveDate;
use std::path::PathBuf;
use structopt::StructOpt;

use crate::model::{Choice, Priority, Status};
use crate::utils::parse_date;

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Create an account.
    Register {
        username: String,
        email: String,
        /// At least 6 characters.
        password: String,
    },
    /// Log in and open your first project.
    Login { username: String, password: String },
    /// End the session.
    Logout,
    /// Show who is logged in.
    Whoami,
    /// List your projects with their task counts.
    Projects,
    /// Create a project.
    NewProject {
        name: String,

        #[structopt(short, long)]
        description: Option<String>,
    },
    /// Show the board of a project.
    Board {
        /// Project id or name (default: your first project).
        #[structopt(short, long)]
        project: Option<String>,

        /// todo, inprogress, review, done or all.
        #[structopt(long, default_value = "all")]
        status: Choice<Status>,

        /// low, medium, high or all.
        #[structopt(long, default_value = "all")]
        priority: Choice<Priority>,

        /// Only show tasks whose title, description or assignee contain this text.
        #[structopt(short, long)]
        search: Option<String>,
    },
    /// Add a task.
    Add {
        title: String,

        /// Project id or name (default: your first project).
        #[structopt(short, long)]
        project: Option<String>,

        #[structopt(short, long)]
        description: Option<String>,

        /// low, medium or high (default: medium).
        #[structopt(long)]
        priority: Option<Priority>,

        /// todo, inprogress, review or done (default: todo).
        #[structopt(long)]
        status: Option<Status>,

        #[structopt(short, long)]
        assignee: Option<String>,

        /// Due date as YYYY-MM-DD.
        #[structopt(long, parse(try_from_str = parse_date))]
        due: Option<NaiveDate>,
    },
    /// Change fields of a task. Pass an empty string to clear a text field.
    Edit {
        /// Task id or a unique prefix of it.
        id: String,

        #[structopt(long)]
        title: Option<String>,

        #[structopt(short, long)]
        description: Option<String>,

        #[structopt(long)]
        priority: Option<Priority>,

        #[structopt(long)]
        status: Option<Status>,

        #[structopt(short, long)]
        assignee: Option<String>,

        /// Due date as YYYY-MM-DD.
        #[structopt(long, parse(try_from_str = parse_date), conflicts_with = "no-due")]
        due: Option<NaiveDate>,

        /// Remove the due date.
        #[structopt(long)]
        no_due: bool,
    },
    /// Move a task to another column.
    Mv {
        /// Task id or a unique prefix of it.
        id: String,

        /// Target column: todo, inprogress, review or done.
        status: Status,
    },
    /// Delete a task.
    Rm {
        /// Task id or a unique prefix of it.
        id: String,
    },
    /// Show all fields of a task.
    Show {
        /// Task id or a unique prefix of it.
        id: String,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(name = "taskflow", about = "A local, single-user kanban board.")]
pub struct CommandLineArgs {
    #[structopt(subcommand)]
    pub action: Command,

    /// Use a different store file.
    #[structopt(parse(from_os_str), short, long)]
    pub store_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_board_filters() {
        let args = CommandLineArgs::from_iter_safe(&[
            "taskflow", "board", "--status", "review", "--search", "seo",
        ])
        .unwrap();
        match args.action {
            Command::Board {
                status,
                priority,
                search,
                project,
            } => {
                assert_eq!(status, Choice::Only(Status::Review));
                assert_eq!(priority, Choice::All);
                assert_eq!(search.as_deref(), Some("seo"));
                assert_eq!(project, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parses_add_with_due_date() {
        let args = CommandLineArgs::from_iter_safe(&[
            "taskflow", "-s", "/tmp/x.sqlite", "add", "Design Homepage", "--priority", "high",
            "--due", "2024-02-15",
        ])
        .unwrap();
        assert_eq!(args.store_file, Some(PathBuf::from("/tmp/x.sqlite")));
        match args.action {
            Command::Add { title, priority, due, status, .. } => {
                assert_eq!(title, "Design Homepage");
                assert_eq!(priority, Some(Priority::High));
                assert_eq!(status, None);
                assert_eq!(due, NaiveDate::from_ymd_opt(2024, 2, 15));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_status() {
        assert!(CommandLineArgs::from_iter_safe(&["taskflow", "mv", "abcd", "blocked"]).is_err());
        assert!(CommandLineArgs::from_iter_safe(&["taskflow", "edit", "abcd", "--due", "2024-01-01", "--no-due"]).is_err());
    }
}
