//! Task records, update bodies, and the derived filter view.
//!
//! DESIGN
//! ======
//! The service owns identity. `TaskId` is opaque: it keeps whatever JSON
//! scalar the service sent (number or string) and writes it back unchanged,
//! so the client never has to know how ids are minted.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// IDENTITY
// =============================================================================

/// Service-assigned task identity.
///
/// `Num` holds any number that is not an `i64` (large unsigned, float)
/// exactly as the service sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Int(i64),
    Num(serde_json::Number),
    Str(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl FromStr for TaskId {
    type Err = Infallible;

    /// Numeric input becomes `Int`, anything else is kept verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>().map_or_else(|_| Self::Str(s.to_owned()), Self::Int))
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Canonical task record as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Body for `POST /tasks/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
}

impl NewTask {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), completed: false }
    }
}

/// Partial update body for `PATCH /tasks/{id}/`. Absent fields are left
/// untouched by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self { completed: Some(completed), ..Self::default() }
    }

    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }
}

/// Trim a user-entered label, rejecting empty or whitespace-only input.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyTitle`] when nothing is left after trimming.
pub fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

// =============================================================================
// FILTER VIEW
// =============================================================================

/// Which subset of the cache is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
}

impl Filter {
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(format!("unknown filter '{other}' (expected all, completed, or pending)")),
        }
    }
}

/// Select the tasks matching `filter`, preserving cache order.
#[must_use]
pub fn filter_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks.iter().filter(|t| filter.matches(t)).collect()
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;
