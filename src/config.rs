//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_PREFS_PATH: &str = ".tasklist/prefs.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root without a trailing slash; task routes hang off `/tasks`.
    pub base_url: String,
    pub prefs_path: PathBuf,
}

impl ClientConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `TASKLIST_BASE_URL`: default `http://127.0.0.1:8000/api`
    /// - `TASKLIST_PREFS_PATH`: default `.tasklist/prefs.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var("TASKLIST_BASE_URL").ok().as_deref(),
            std::env::var("TASKLIST_PREFS_PATH").ok().as_deref(),
        )
    }

    /// Build config from optional raw values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL.
    pub fn from_values(base_url: Option<&str>, prefs_path: Option<&str>) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url.unwrap_or(DEFAULT_BASE_URL))?;
        let prefs_path = PathBuf::from(prefs_path.unwrap_or(DEFAULT_PREFS_PATH));
        Ok(Self { base_url, prefs_path })
    }
}

/// Trim trailing slashes and check the URL can carry path segments.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] for unparsable, non-http(s), or
/// non-hierarchical URLs.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidBaseUrl { url: raw.to_owned(), reason };

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".into()));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
