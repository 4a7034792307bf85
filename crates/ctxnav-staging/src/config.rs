#![forbid(unsafe_code)]

//! Staging configuration and its hot-reloadable handle.
//!
//! [`StagingConfig`] can be loaded from TOML or JSON at startup and adjusted
//! by environment variables. The refresh coordinator reads it through a
//! [`ConfigHandle`] on **every** refresh, so a reload takes effect on the
//! next refresh without rewiring anything.
//!
//! # Loading
//!
//! ```toml
//! # ctxnav.toml
//! use_hunk_mode = true
//! diff_context_size = 5
//! ```
//!
//! ```rust,ignore
//! let config = StagingConfig::from_toml_file("ctxnav.toml")?.with_env_overrides();
//! let handle = ConfigHandle::new(config);
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `CTXNAV_HUNK_MODE` | bool | false | Select whole hunks in the staging view |
//! | `CTXNAV_DIFF_CONTEXT` | u32 | 3 | Context lines around each change |

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of context lines in staging diffs.
pub const DEFAULT_DIFF_CONTEXT_SIZE: u32 = 3;

/// Largest accepted context size.
pub const MAX_DIFF_CONTEXT_SIZE: u32 = 1000;

/// Tunables for the staging panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Select whole hunks instead of single lines.
    pub use_hunk_mode: bool,
    /// Context lines requested from the diff provider.
    pub diff_context_size: u32,
    /// Title of the unstaged (main) pane.
    pub unstaged_title: String,
    /// Title of the staged (secondary) pane.
    pub staged_title: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            use_hunk_mode: false,
            diff_context_size: DEFAULT_DIFF_CONTEXT_SIZE,
            unstaged_title: "Unstaged changes".to_string(),
            staged_title: "Staged changes".to_string(),
        }
    }
}

impl StagingConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.diff_context_size > MAX_DIFF_CONTEXT_SIZE {
            errors.push(format!(
                "diff_context_size must be at most {MAX_DIFF_CONTEXT_SIZE}, got {}",
                self.diff_context_size
            ));
        }
        if self.unstaged_title.trim().is_empty() {
            errors.push("unstaged_title must not be empty".to_string());
        }
        if self.staged_title.trim().is_empty() {
            errors.push("staged_title must not be empty".to_string());
        }
        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Apply `CTXNAV_*` overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("CTXNAV_HUNK_MODE") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.use_hunk_mode = true,
                "0" | "false" | "no" | "off" => self.use_hunk_mode = false,
                other => {
                    tracing::warn!(target: "ctxnav.staging", value = %other, "ignoring invalid CTXNAV_HUNK_MODE");
                }
            }
        }
        if let Some(raw) = lookup("CTXNAV_DIFF_CONTEXT") {
            match raw.trim().parse::<u32>() {
                Ok(n) => self.diff_context_size = n.min(MAX_DIFF_CONTEXT_SIZE),
                Err(_) => {
                    tracing::warn!(target: "ctxnav.staging", value = %raw, "ignoring invalid CTXNAV_DIFF_CONTEXT");
                }
            }
        }
        self
    }
}

/// Shared, atomically swappable handle to the current [`StagingConfig`].
///
/// Reads are wait-free; a reload swaps the whole config at once, so a
/// reader never sees a half-updated value.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<StagingConfig>>,
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(StagingConfig::default())
    }
}

impl ConfigHandle {
    /// Create a handle holding `config`.
    #[must_use]
    pub fn new(config: StagingConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Snapshot of the current config.
    #[must_use]
    pub fn load(&self) -> Arc<StagingConfig> {
        self.inner.load_full()
    }

    /// Replace the current config.
    pub fn store(&self, config: StagingConfig) {
        self.inner.store(Arc::new(config));
    }

    /// Reload from a TOML file; the current config is kept on error.
    pub fn reload_toml_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let config = StagingConfig::from_toml_file(path)?;
        self.store(config);
        tracing::info!(target: "ctxnav.staging", "staging config reloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = StagingConfig::default();
        assert!(!c.use_hunk_mode);
        assert_eq!(c.diff_context_size, 3);
        assert!(c.validate().is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = StagingConfig::from_toml_str("use_hunk_mode = true").unwrap();
        assert!(c.use_hunk_mode);
        assert_eq!(c.diff_context_size, DEFAULT_DIFF_CONTEXT_SIZE);
        assert_eq!(c.staged_title, "Staged changes");
    }

    #[test]
    fn json_round_trip() {
        let c = StagingConfig {
            use_hunk_mode: true,
            diff_context_size: 8,
            ..StagingConfig::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(StagingConfig::from_json_str(&json).unwrap(), c);
    }

    #[test]
    fn validation_collects_all_errors() {
        let err = StagingConfig::from_toml_str(
            "diff_context_size = 5000\nunstaged_title = \"  \"",
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(
            StagingConfig::from_toml_str("use_hunk_mode = \"maybe\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn env_overrides() {
        let c = StagingConfig::default().with_overrides_from(|name| match name {
            "CTXNAV_HUNK_MODE" => Some("TRUE".into()),
            "CTXNAV_DIFF_CONTEXT" => Some("99999".into()),
            _ => None,
        });
        assert!(c.use_hunk_mode);
        assert_eq!(c.diff_context_size, MAX_DIFF_CONTEXT_SIZE);
    }

    #[test]
    fn invalid_env_values_ignored() {
        let c = StagingConfig::default().with_overrides_from(|name| match name {
            "CTXNAV_HUNK_MODE" => Some("sometimes".into()),
            "CTXNAV_DIFF_CONTEXT" => Some("-1".into()),
            _ => None,
        });
        assert_eq!(c, StagingConfig::default());
    }

    #[test]
    fn handle_swaps_atomically() {
        let handle = ConfigHandle::default();
        let before = handle.load();
        handle.store(StagingConfig {
            use_hunk_mode: true,
            ..StagingConfig::default()
        });
        assert!(!before.use_hunk_mode);
        assert!(handle.load().use_hunk_mode);
        // Clones share the same slot.
        let clone = handle.clone();
        clone.store(StagingConfig::default());
        assert!(!handle.load().use_hunk_mode);
    }
}
