#![forbid(unsafe_code)]

//! Error types for staging refresh and configuration loading.

use thiserror::Error;

/// The diff provider could not produce a diff.
///
/// Providers must return this instead of an empty diff when the underlying
/// command fails: an empty diff is routed as "nothing to show" and would
/// silently move focus away from the staging panels.
#[derive(Debug, Error)]
#[error("diff for `{path}` failed: {message}")]
pub struct DiffError {
    /// Path of the file whose diff was requested.
    pub path: String,
    /// Provider-specific description of the failure.
    pub message: String,
}

impl DiffError {
    /// Create a diff error for `path`.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failures surfaced by [`StagingHelper`](crate::helper::StagingHelper).
#[derive(Debug, Error)]
pub enum StagingError {
    /// The diff provider failed; panel state and focus are unchanged.
    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Errors that can occur when loading staging configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
