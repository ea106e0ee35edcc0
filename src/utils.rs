use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Minimum number of characters in a password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// Loose email shape check: something@something.something, no spaces.
pub fn validate_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Format a due date as "Feb 15, 2024".
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => "No due date".to_string(),
    }
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    format_date(Some(at.date_naive()))
}

/// Parse a calendar date typed as YYYY-MM-DD.
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("demo@taskflow.com"));
        assert!(validate_email("a@b.co"));
        assert!(!validate_email("demo@taskflow"));
        assert!(!validate_email("demo taskflow@x.com"));
        assert!(!validate_email("@taskflow.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(!validate_password("12345"));
        assert!(validate_password("123456"));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 2, 5)), "Feb 5, 2024");
        assert_eq!(format_date(None), "No due date");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-20").ok(), NaiveDate::from_ymd_opt(2024, 2, 20));
        assert!(parse_date("20/02/2024").is_err());
    }
}
