//! Frontend Models
//!
//! Data structures matching the todo API payloads.

use serde::{Deserialize, Serialize};

/// Todo data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-assigned identifier, never changed after creation
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Body of `POST /todos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTodo {
    pub title: String,
}

/// Body of `PATCH /todos/{id}`; unset fields stay untouched server-side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn completed(completed: bool) -> Self {
        Self { title: None, completed: Some(completed) }
    }

    pub fn title_and_completed(title: impl Into<String>, completed: bool) -> Self {
        Self { title: Some(title.into()), completed: Some(completed) }
    }
}

/// Trim a user-entered title, rejecting blank input
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
