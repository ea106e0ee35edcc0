//! # TaskFlow
//!
//! A local, single-user kanban board. Users, projects and tasks live in a
//! SQLite file used as a key-value store; the board is recomputed from it on
//! every command.
//!
//! ## Modules
//!
//! - `store`: the persistent key-value store
//! - `auth`: login, registration and the session pointer
//! - `projects`, `tasks`: record operations
//! - `filter`: task filtering and the search debounce
//! - `board`, `dragdrop`, `events`, `notifications`: view models and UI plumbing
//! - `app`: the controller tying them together
//! - `cli`, `interface`: the command line front end

#[macro_use]
extern crate prettytable;

pub mod app;
pub mod auth;
pub mod board;
pub mod cli;
pub mod config;
pub mod dragdrop;
pub mod error;
pub mod events;
pub mod filter;
pub mod interface;
pub mod model;
pub mod notifications;
pub mod projects;
pub mod seed;
pub mod store;
pub mod tasks;
pub mod utils;

pub use error::{BoardError, Result};
