//! Remote task service seam.
//!
//! DESIGN
//! ======
//! `TaskApi` is the only way the client talks to the service. `HttpTaskApi`
//! is the production implementation; tests substitute an in-memory mock.
//! One contract is supported:
//!
//! - `GET    {base}/tasks/`       -> `[Task]`
//! - `POST   {base}/tasks/`       -> `Task`
//! - `PATCH  {base}/tasks/{id}/`  -> `Task`
//! - `DELETE {base}/tasks/{id}/`  -> any 2xx

pub mod http;

pub use http::HttpTaskApi;

use crate::error::ClientError;
use crate::task::{NewTask, Task, TaskId, TaskPatch};

#[async_trait::async_trait]
pub trait TaskApi: Send + Sync {
    /// Read the full collection in service order.
    async fn list(&self) -> Result<Vec<Task>, ClientError>;

    /// Create a task and return the canonical record, including its id.
    async fn create(&self, task: &NewTask) -> Result<Task, ClientError>;

    /// Apply a partial update and return the resulting record.
    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ClientError>;

    async fn delete(&self, id: &TaskId) -> Result<(), ClientError>;
}
