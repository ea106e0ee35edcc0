use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered user. Passwords are kept in plain text: the store is a
/// local, single-user database and no credential leaves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// A board. The owner is always part of `members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Whether the user owns the project or is listed as a member.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.owner_id == user_id || self.members.iter().any(|m| m == user_id)
    }
}

/// A card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task priority. Cards default to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Task lifecycle state, one board column each. Any state can move to any
/// other: a drop on a column simply takes that column's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    InProgress,
    Review,
    Done,
}

impl Default for Status {
    fn default() -> Self {
        Status::Todo
    }
}

impl Status {
    /// Board columns, left to right.
    pub const ALL: [Status; 4] = [Status::Todo, Status::InProgress, Status::Review, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "inprogress",
            Status::Review => "review",
            Status::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Review => "Review",
            Status::Done => "Done",
        }
    }
}

/// Error returned when parsing an unknown status or priority name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseChoiceError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for Status {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        match key.as_str() {
            "todo" => Ok(Status::Todo),
            "inprogress" => Ok(Status::InProgress),
            "review" => Ok(Status::Review),
            "done" => Ok(Status::Done),
            _ => Err(ParseChoiceError {
                kind: "status",
                value: s.to_string(),
                expected: "todo, inprogress, review, done",
            }),
        }
    }
}

impl FromStr for Priority {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParseChoiceError {
                kind: "priority",
                value: s.to_string(),
                expected: "low, medium, high",
            }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter value with an `all` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

/// Data for a new user, as typed in the registration form.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Data for a new project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub members: Vec<String>,
}

/// Data for a new task. Missing status and priority take their defaults.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Fields to merge over an existing task. `None` leaves a field untouched;
/// an empty string clears an optional text field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub assignee: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// A patch that only moves the task to another column.
    pub fn status(status: Status) -> Self {
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

/// Turn blank optional text into `None`, trimming the rest.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Traits
pub trait TaskExtra {
    fn is_done(&self) -> bool;
    fn is_overdue(&self, today: NaiveDate) -> bool;
}

impl TaskExtra for Task {
    fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => !self.is_done() && due < today,
            None => false,
        }
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: Status, due: Option<NaiveDate>) -> Task {
        Task {
            id: "t1".into(),
            project_id: "p1".into(),
            title: "Design Homepage".into(),
            description: None,
            priority: Priority::High,
            status,
            assignee: None,
            due_date: due,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_parsing_accepts_column_spellings() {
        assert_eq!("todo".parse::<Status>().unwrap(), Status::Todo);
        assert_eq!("inprogress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("In-Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("DONE".parse::<Status>().unwrap(), Status::Done);
        assert!("blocked".parse::<Status>().is_err());
    }

    #[test]
    fn test_choice_all_sentinel() {
        assert_eq!("all".parse::<Choice<Priority>>().unwrap(), Choice::All);
        assert_eq!(
            "high".parse::<Choice<Priority>>().unwrap(),
            Choice::Only(Priority::High)
        );
        assert!(Choice::<Priority>::All.matches(&Priority::Low));
        assert!(!Choice::Only(Priority::High).matches(&Priority::Low));
    }

    #[test]
    fn test_task_serializes_with_board_field_names() {
        let t = task(Status::InProgress, NaiveDate::from_ymd_opt(2024, 2, 15));
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["projectId"], "p1");
        assert_eq!(json["status"], "inprogress");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["dueDate"], "2024-02-15");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_task_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "id": "x", "projectId": "p", "title": "T",
            "createdAt": "2024-02-01T10:00:00Z", "updatedAt": "2024-02-01T10:00:00Z"
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.status, Status::Todo);
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.assignee, None);
    }

    #[test]
    fn test_overdue_ignores_done_tasks() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 2, 15);
        assert!(task(Status::Review, due).is_overdue(today));
        assert!(!task(Status::Done, due).is_overdue(today));
        assert!(!task(Status::Todo, None).is_overdue(today));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Jane ".into())), Some("Jane".into()));
        assert_eq!(non_blank(None), None);
    }
}
