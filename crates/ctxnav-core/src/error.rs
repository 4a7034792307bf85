#![forbid(unsafe_code)]

//! Error types for context wiring and key parsing.

use thiserror::Error;

use crate::context::ContextKey;

/// A single-owner hook slot on a [`Context`](crate::context::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookSlot {
    /// Click on the context's view.
    OnClick,
    /// Click inside the focused main view.
    OnClickFocusedMainView,
    /// Render the context's selection into the main views.
    OnRenderToMain,
}

impl HookSlot {
    /// Name of the slot as it appears in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OnClick => "on_click",
            Self::OnClickFocusedMainView => "on_click_focused_main_view",
            Self::OnRenderToMain => "on_render_to_main",
        }
    }
}

impl std::fmt::Display for HookSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Controller-wiring failures.
///
/// These are programmer errors detected while controllers attach to
/// contexts at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// A second controller tried to claim a single-owner hook slot.
    #[error("only one controller is allowed to set {slot} on context `{key}`")]
    DuplicateHook {
        /// The contested slot.
        slot: HookSlot,
        /// The context that already owns a handler in that slot.
        key: ContextKey,
    },
    /// Two contexts were registered under the same key.
    #[error("context `{0}` is already registered")]
    DuplicateKey(ContextKey),
}

/// A keymap label that does not describe a key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid key label `{label}`")]
pub struct ParseKeyError {
    label: String,
}

impl ParseKeyError {
    pub(crate) fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
        }
    }

    /// The label that failed to parse.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Error returned by binding and click handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result of running a binding or click handler.
pub type HandlerResult = Result<(), HandlerError>;
