//! Task list client — the local cache kept in step with the service.
//!
//! DESIGN
//! ======
//! The cache is a mirror, never the source of truth. Every mutation goes to
//! the service first and the cache only moves to whatever the service sent
//! back. Operations take `&mut self`, so there is exactly one writer and
//! no locking; overlapping user actions are last-write-wins at the service.
//!
//! ERROR HANDLING
//! ==============
//! Failures are logged with `tracing` and returned. The cache stays at the
//! last successful sync. Validation failures never reach the network.

use std::convert::Infallible;

use tracing::{debug, info, warn};

use crate::api::TaskApi;
use crate::error::{ClientError, ValidationError};
use crate::task::{Filter, NewTask, Task, TaskId, TaskPatch, filter_tasks, validate_title};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last load failed; the cache holds the previous contents.
    Failed,
}

/// In-progress label edit for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TaskId,
    pub title: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct TaskListClient<A> {
    api: A,
    tasks: Vec<Task>,
    load_state: LoadState,
    draft: String,
    editing: Option<EditSession>,
    filter: Filter,
}

impl<A: TaskApi> TaskListClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            load_state: LoadState::Idle,
            draft: String::new(),
            editing: None,
            filter: Filter::All,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Find a cached task whose id renders as `raw`, whatever its wire form.
    pub fn find_by_display(&self, raw: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id.to_string() == raw)
    }

    /// Map user-typed id text onto the cached id it names.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] if no cached task renders as `raw`.
    pub fn resolve_id(&self, raw: &str) -> Result<TaskId, ClientError> {
        self.find_by_display(raw)
            .map(|t| t.id.clone())
            .ok_or_else(|| ClientError::NotFound(raw.parse().unwrap_or_else(|e: Infallible| match e {})))
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskCounts { total: self.tasks.len(), completed, pending: self.tasks.len() - completed }
    }

    // -------------------------------------------------------------------------
    // Load
    // -------------------------------------------------------------------------

    /// Replace the cache with the service's collection.
    ///
    /// # Errors
    ///
    /// Returns the transport/status error; the previous cache is kept and
    /// the load state becomes [`LoadState::Failed`].
    pub async fn load_all(&mut self) -> Result<(), ClientError> {
        self.load_state = LoadState::Loading;
        match self.api.list().await {
            Ok(tasks) => {
                info!(count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                self.load_state = LoadState::Loaded;
                self.drop_stale_edit();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "task load failed");
                self.load_state = LoadState::Failed;
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Create
    // -------------------------------------------------------------------------

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Create a task from the draft, clearing the draft only on success.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] for a blank draft (no request is sent),
    /// otherwise the service error.
    pub async fn create(&mut self) -> Result<&Task, ClientError> {
        let title = validated(&self.draft)?;
        let index = self.append(title).await?;
        self.draft.clear();
        Ok(&self.tasks[index])
    }

    /// Create a task from an explicit title, bypassing the draft.
    ///
    /// # Errors
    ///
    /// Same as [`TaskListClient::create`].
    pub async fn create_task(&mut self, title: &str) -> Result<&Task, ClientError> {
        let title = validated(title)?;
        let index = self.append(title).await?;
        Ok(&self.tasks[index])
    }

    async fn append(&mut self, title: String) -> Result<usize, ClientError> {
        let created = self
            .api
            .create(&NewTask::new(title))
            .await
            .inspect_err(|e| warn!(error = %e, code = e.error_code(), "task create failed"))?;
        debug!(id = %created.id, "task created");
        self.tasks.push(created);
        Ok(self.tasks.len() - 1)
    }

    // -------------------------------------------------------------------------
    // Toggle
    // -------------------------------------------------------------------------

    /// Ask the service to invert the completion flag; the cache follows the
    /// response, never the request.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] if the id is not cached (no request is
    /// sent), otherwise the service error. The cache is unchanged on error.
    pub async fn toggle(&mut self, id: &TaskId) -> Result<&Task, ClientError> {
        let index = self.index_of(id)?;
        let patch = TaskPatch::completed(!self.tasks[index].completed);
        self.apply_update(index, &patch, "toggle").await
    }

    // -------------------------------------------------------------------------
    // Edit
    // -------------------------------------------------------------------------

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Open an edit session pre-filled with the cached title.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] if the id is not cached.
    pub fn begin_edit(&mut self, id: &TaskId) -> Result<(), ClientError> {
        let index = self.index_of(id)?;
        self.editing = Some(EditSession { id: id.clone(), title: self.tasks[index].title.clone() });
        Ok(())
    }

    pub fn set_edit_title(&mut self, title: impl Into<String>) {
        if let Some(session) = self.editing.as_mut() {
            session.title = title.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the session's title; the session closes only on success.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotEditing`] without a session,
    /// [`ValidationError::EmptyTitle`] for a blank title, otherwise the
    /// service error.
    pub async fn commit_edit(&mut self) -> Result<&Task, ClientError> {
        let Some(session) = self.editing.clone() else {
            return Err(ValidationError::NotEditing.into());
        };
        let title = validated(&session.title)?;
        let index = self.index_of(&session.id)?;
        self.apply_update(index, &TaskPatch::title(title), "edit")
            .await?;
        self.editing = None;
        Ok(&self.tasks[index])
    }

    /// Update a task's title without an edit session.
    ///
    /// # Errors
    ///
    /// Same as [`TaskListClient::commit_edit`], minus the session check.
    pub async fn edit_title(&mut self, id: &TaskId, title: &str) -> Result<&Task, ClientError> {
        let title = validated(title)?;
        let index = self.index_of(id)?;
        self.apply_update(index, &TaskPatch::title(title), "edit")
            .await
    }

    // -------------------------------------------------------------------------
    // Delete
    // -------------------------------------------------------------------------

    /// Delete on the service, then drop the cached record.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] if the id is not cached, otherwise the
    /// service error. A failed delete leaves the task in place.
    pub async fn delete(&mut self, id: &TaskId) -> Result<Task, ClientError> {
        let index = self.index_of(id)?;
        self.api
            .delete(id)
            .await
            .inspect_err(|e| warn!(%id, error = %e, code = e.error_code(), "task delete failed"))?;

        let removed = self.tasks.remove(index);
        if self.editing.as_ref().is_some_and(|s| &s.id == id) {
            self.editing = None;
        }
        debug!(%id, "task deleted");
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Filter view
    // -------------------------------------------------------------------------

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Tasks matching the active filter, in cache order.
    pub fn visible(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, self.filter)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn index_of(&self, id: &TaskId) -> Result<usize, ClientError> {
        self.tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| ClientError::NotFound(id.clone()))
    }

    async fn apply_update(&mut self, index: usize, patch: &TaskPatch, op: &'static str) -> Result<&Task, ClientError> {
        let id = self.tasks[index].id.clone();
        let updated = self
            .api
            .update(&id, patch)
            .await
            .inspect_err(|e| warn!(%id, op, error = %e, code = e.error_code(), "task update failed"))?;
        if updated.id != id {
            warn!(requested = %id, returned = %updated.id, op, "service returned a different task id");
            return Err(ClientError::Decode(format!("update of task {id} returned task {}", updated.id)));
        }
        debug!(%id, op, completed = updated.completed, "task updated");
        self.tasks[index] = updated;
        Ok(&self.tasks[index])
    }

    fn drop_stale_edit(&mut self) {
        if let Some(session) = &self.editing {
            if self.task(&session.id).is_none() {
                self.editing = None;
            }
        }
    }
}

fn validated(raw: &str) -> Result<String, ClientError> {
    validate_title(raw).map_err(|e| {
        warn!(error = %e, "task input rejected");
        ClientError::from(e)
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
