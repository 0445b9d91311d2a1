//! Tareas - a terminal client for the gestion-tareas task API.
//!
//! This library provides the core functionality for the `tareas` CLI tool:
//! session persistence, login/logout, request authorization, the task and
//! category REST client, and the task list/dashboard views.

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod session;
pub mod views;


/// Library-level error type for Tareas operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("KDL error: {0}")]
    Kdl(#[from] kdl::KdlError),

    /// No response reached the server.
    #[error("Cannot reach the server: {0}")]
    NetworkUnavailable(String),

    /// The server answered 401.
    #[error("Unauthorized: the server rejected the credentials")]
    Unauthorized,

    /// The server reported success but the login payload lacks a token or a user.
    #[error("Incomplete credentials in login response: {0}")]
    IncompleteCredentials(String),

    /// The stored identity record could not be parsed.
    #[error("Malformed session state: {0}")]
    MalformedPersistedState(String),

    #[error("Not logged in: run `tareas login <username>` first")]
    NotLoggedIn,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Tareas operations.
pub type Result<T> = std::result::Result<T, Error>;
