//! Error types for the task client, preference store, and configuration.
//!
//! ERROR HANDLING
//! ==============
//! Failures fall into three groups: network/transport, non-success HTTP
//! status, and local validation. All of them leave the cache at its last
//! successful sync. Only validation errors are meant to interrupt the user;
//! the rest are logged and surfaced as a failed state.

use crate::task::TaskId;

// =============================================================================
// CLIENT
// =============================================================================

/// Local input rejected before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("no task is being edited")]
    NotEditing,
}

/// Coarse classification used by callers deciding how loudly to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Status,
    Validation,
    Local,
}

/// Errors produced by task operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("service returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not a valid task payload.
    #[error("response decode failed: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The id is not in the local cache.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ClientError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Decode(_) => ErrorKind::Network,
            Self::Status { .. } => ErrorKind::Status,
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::HttpClientBuild(_) => ErrorKind::Local,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Status { .. } => "E_STATUS",
            Self::Decode(_) => "E_DECODE",
            Self::Validation(_) => "E_VALIDATION",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    /// True for errors the user should see immediately.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation)
    }
}

// =============================================================================
// PREFERENCES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("preference store lock poisoned")]
    Poisoned,
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
