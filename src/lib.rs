//! # tasklist
//!
//! Client for a remote to-do service. Keeps an ordered local mirror of the
//! service's task collection and supports load, create, toggle, edit,
//! delete, and a derived completed/pending filter. A dark-mode display
//! preference is persisted separately through an injected store.
//!
//! The `cli` crate in this repository drives it from the command line.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod prefs;
pub mod task;
pub mod view;

pub use api::{HttpTaskApi, TaskApi};
pub use client::{EditSession, LoadState, TaskCounts, TaskListClient};
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError, ErrorKind, PrefsError, ValidationError};
pub use prefs::{DarkMode, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use task::{Filter, NewTask, Task, TaskId, TaskPatch};
