//! Data models for Tareas entities.
//!
//! This module defines the core data structures exchanged with the server:
//! - `Task` - Work items with completion state, priority, and due date
//! - `Category` - Named, colored buckets for tasks
//! - `Identity` - The logged-in user as far as the client needs to know it
//! - `TaskDraft` / `CategoryDraft` / `NewUser` - Write models for create/update
//!
//! The server speaks Spanish field names; serde renames map them onto the
//! English names used throughout the crate.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority.
///
/// Serialized as the server's `BAJA`/`MEDIA`/`ALTA`; the English names are
/// accepted on input as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "BAJA", alias = "LOW")]
    Low,
    #[default]
    #[serde(rename = "MEDIA", alias = "MEDIUM")]
    Medium,
    #[serde(rename = "ALTA", alias = "HIGH")]
    High,
}

impl Priority {
    /// Parse from a user-supplied string, case-insensitive, English or Spanish.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baja" => Some(Priority::Low),
            "medium" | "media" => Some(Priority::Medium),
            "high" | "alta" => Some(Priority::High),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// All priorities, lowest first.
    pub fn all() -> [Priority; 3] {
        [Priority::Low, Priority::Medium, Priority::High]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task as returned by the server.
///
/// The client only ever holds transient copies; the server is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier
    pub id: i64,

    /// Task title
    #[serde(rename = "titulo")]
    pub title: String,

    /// Detailed description
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the task is done
    #[serde(rename = "completada", default)]
    pub completed: bool,

    /// Creation timestamp (server local time, no offset)
    #[serde(rename = "fechaCreacion")]
    pub created_at: NaiveDateTime,

    /// Due date
    #[serde(rename = "fechaVencimiento", default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<NaiveDate>,

    #[serde(rename = "prioridad", default)]
    pub priority: Priority,

    /// Owning user
    #[serde(rename = "usuarioId", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,

    #[serde(rename = "categoriaId", default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    /// Denormalized category name, filled in by the server
    #[serde(rename = "categoriaNombre", default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

/// A category as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,

    #[serde(rename = "nombre")]
    pub name: String,

    /// Hex color, e.g. `#ff4444`
    #[serde(default)]
    pub color: String,

    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "fechaCreacion", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,

    #[serde(rename = "usuarioId", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
}

/// User record as the server sends it. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// The logged-in user: the subset of the user record needed to label
/// requests and output without re-fetching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: None,
        }
    }
}

impl TryFrom<&UserRecord> for Identity {
    type Error = crate::Error;

    /// An identity requires a non-null id; a missing username becomes empty.
    fn try_from(record: &UserRecord) -> crate::Result<Self> {
        let id = record.id.ok_or_else(|| {
            crate::Error::IncompleteCredentials("user record has no id".to_string())
        })?;
        Ok(Self {
            id,
            username: record.username.clone().unwrap_or_default(),
            email: record.email.clone(),
        })
    }
}

/// Body of `POST /usuarios/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of a successful login.
///
/// Two shapes exist in the wild: `{token, usuario, message}` and `{token}`.
/// Both decode; `AuthGateway::commit_login` decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "usuario", default)]
    pub user: Option<UserRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /usuarios/registro`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Reference to a category by id, as nested in a task write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
}

/// Write model for `POST /tareas` and `PUT /tareas/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "descripcion")]
    pub description: Option<String>,

    #[serde(rename = "prioridad")]
    pub priority: Priority,

    #[serde(rename = "fechaVencimiento")]
    pub due_at: Option<NaiveDate>,

    #[serde(rename = "completada")]
    pub completed: bool,

    #[serde(rename = "usuarioId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,

    /// Always serialized; `null` detaches the task from its category.
    #[serde(rename = "categoria")]
    pub category: Option<CategoryRef>,
}

impl TaskDraft {
    /// A new, pending task with default priority.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            due_at: None,
            completed: false,
            owner_id: None,
            category: None,
        }
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_at: task.due_at,
            completed: task.completed,
            owner_id: task.owner_id,
            category: task.category_id.map(|id| CategoryRef { id }),
        }
    }
}

/// Write model for `POST /categorias` and `PUT /categorias/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    pub color: String,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
