/// Errors reported by board operations.
///
/// Everything except `Storage` is recoverable at the UI boundary: the command
/// is aborted, no state changes, and the message is shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// No user matches the given username and password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already registered")]
    DuplicateEmail,

    /// The command needs a session pointer and there is none.
    #[error("Not logged in. Use 'taskflow login' first.")]
    NotLoggedIn,

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// The store could not be read or written.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl BoardError {
    pub fn validation(message: impl Into<String>) -> Self {
        BoardError::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
