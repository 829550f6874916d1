//! `reqwest`-backed task service client.
//!
//! Thin HTTP wrapper. No timeouts, retries, or cancellation: each call
//! waits for the service and reports whatever came back. Body parsing is
//! split into `parse_body` for testability.

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::TaskApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::task::{NewTask, Task, TaskId, TaskPatch};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpTaskApi {
    http: reqwest::Client,
    base: Url,
}

impl HttpTaskApi {
    /// Build a client rooted at `base_url` (e.g. `http://host/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot carry task paths or the HTTP
    /// client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::HttpClientBuild(format!("invalid base URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::HttpClientBuild(format!("base URL '{base_url}' cannot carry a path")));
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base })
    }

    /// # Errors
    ///
    /// See [`HttpTaskApi::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/tasks/` or `{base}/tasks/{id}/`, with the id percent-encoded.
    /// The trailing slash is part of the route.
    fn tasks_url(&self, id: Option<&TaskId>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("tasks");
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
            segments.push("");
        }
        url
    }

    fn request(&self, method: Method, id: Option<&TaskId>) -> RequestBuilder {
        let url = self.tasks_url(id);
        debug!(%method, %url, "task request");
        self.http.request(method, url)
    }

    /// Send and return the body text of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), bytes = text.len(), "task response");

        if !status.is_success() {
            return Err(ClientError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let text = self.send(self.request(Method::GET, None)).await?;
        parse_body(&text)
    }

    async fn create(&self, task: &NewTask) -> Result<Task, ClientError> {
        let text = self
            .send(self.request(Method::POST, None).json(task))
            .await?;
        parse_body(&text)
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ClientError> {
        let text = self
            .send(self.request(Method::PATCH, Some(id)).json(patch))
            .await?;
        parse_body(&text)
    }

    async fn delete(&self, id: &TaskId) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, Some(id))).await?;
        Ok(())
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ClientError> {
    serde_json::from_str(text).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
