use chrono::Utc;

use crate::error::{BoardError, Result};
use crate::model::{NewUser, User};
use crate::store::{generate_id, Store};
use crate::utils::{validate_email, validate_password, MIN_PASSWORD_LENGTH};

/// Log a user in by exact username and password match, and make it the
/// session user. A wrong password and an unknown username fail the same way.
pub fn login(store: &Store, username: &str, password: &str) -> Result<User> {
    if username.is_empty() || password.is_empty() {
        return Err(BoardError::validation("Please fill in all fields"));
    }

    let user = store
        .users()?
        .into_iter()
        .find(|u| u.username == username && u.password == password)
        .ok_or(BoardError::InvalidCredentials)?;

    store.set_current_user(&user)?;
    tracing::info!(user_id = %user.id, "logged in");
    Ok(user)
}

/// Create a new account. The new user is not logged in.
pub fn register(store: &Store, data: NewUser) -> Result<User> {
    let NewUser {
        username,
        email,
        password,
    } = data;

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(BoardError::validation("Please fill in all fields"));
    }
    if !validate_email(&email) {
        return Err(BoardError::validation("Please enter a valid email address"));
    }
    if !validate_password(&password) {
        return Err(BoardError::validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    let mut users = store.users()?;
    if users.iter().any(|u| u.username == username) {
        return Err(BoardError::DuplicateUsername);
    }
    if users.iter().any(|u| u.email == email) {
        return Err(BoardError::DuplicateEmail);
    }

    let user = User {
        id: generate_id(),
        username,
        email,
        password,
        created_at: Utc::now(),
    };
    users.push(user.clone());
    store.save_users(&users)?;
    tracing::info!(user_id = %user.id, username = %user.username, "registered user");
    Ok(user)
}

pub fn logout(store: &Store) -> Result<()> {
    store.clear_current_user()?;
    tracing::info!("logged out");
    Ok(())
}

/// The user kept in the session pointer, if someone is logged in.
pub fn session_user(store: &Store) -> Result<Option<User>> {
    Ok(store.current_user()?)
}
