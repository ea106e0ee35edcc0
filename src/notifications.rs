use std::fmt;
use std::time::{Duration, Instant};

/// How long a notification stays up unless closed earlier.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub message: String,
    /// `None` keeps the notification until it is dismissed.
    pub expires_at: Option<Instant>,
}

/// Pending toast messages.
#[derive(Debug)]
pub struct Notifications {
    items: Vec<Notification>,
    next_id: u64,
    duration: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Notifications::new(DEFAULT_NOTIFICATION_DURATION)
    }
}

impl Notifications {
    /// A zero `duration` makes notifications sticky.
    pub fn new(duration: Duration) -> Self {
        Notifications {
            items: Vec::new(),
            next_id: 1,
            duration,
        }
    }

    /// Show a message with the default duration. Returns its id.
    pub fn show(&mut self, level: Level, message: impl Into<String>, now: Instant) -> u64 {
        self.show_for(level, message, self.duration, now)
    }

    pub fn show_for(
        &mut self,
        level: Level,
        message: impl Into<String>,
        duration: Duration,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        tracing::debug!(id, %level, %message, "notify");
        self.items.push(Notification {
            id,
            level,
            message,
            expires_at: if duration.is_zero() { None } else { Some(now + duration) },
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.show(Level::Success, message, Instant::now())
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.show(Level::Error, message, Instant::now())
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.show(Level::Warning, message, Instant::now())
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.show(Level::Info, message, Instant::now())
    }

    /// Close a notification before its timer runs out.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop every notification whose time is up.
    pub fn expire(&mut self, now: Instant) {
        self.items
            .retain(|n| n.expires_at.map_or(true, |at| at > now));
    }

    pub fn pending(&self) -> &[Notification] {
        &self.items
    }

    /// Take all pending notifications, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }
}
