#![forbid(unsafe_code)]

//! Staging pane contexts.
//!
//! A [`PatchExplorerContext`] is a [`Context`] plus the pane's
//! [`PatchState`] behind a mutex. The refresh coordinator is the only
//! writer; everything else reads briefly under the lock.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use ctxnav_core::{Context, ContextKey};

use crate::patch_state::PatchState;

/// One staging pane.
#[derive(Debug)]
pub struct PatchExplorerContext {
    context: Arc<Context>,
    state: Mutex<Option<PatchState>>,
}

impl PatchExplorerContext {
    /// Wrap `context` with an empty state.
    #[must_use]
    pub fn new(context: Arc<Context>) -> Self {
        Self {
            context,
            state: Mutex::new(None),
        }
    }

    /// The underlying context.
    #[must_use]
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    #[must_use]
    pub fn key(&self) -> ContextKey {
        self.context.key()
    }

    /// Lock the pane state.
    ///
    /// Never hold the guard across a focus push: the push may re-enter the
    /// refresh routine, which locks again.
    pub fn lock_state(&self) -> MutexGuard<'_, Option<PatchState>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Lock the pane state if nobody else holds it.
    pub fn try_lock_state(&self) -> Option<MutexGuard<'_, Option<PatchState>>> {
        match self.state.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(e)) => Some(e.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Whether the pane currently has something to show.
    pub fn has_content(&self) -> bool {
        self.lock_state().is_some()
    }

    /// Selected line of the current state.
    pub fn selected_line_idx(&self) -> Option<usize> {
        self.lock_state().as_ref().map(PatchState::selected_line_idx)
    }

    /// Scroll the pane's view so the selection is in focus.
    pub fn focus_selection(&self) {
        let Some(line) = self.selected_line_idx() else {
            return;
        };
        if let Some(view) = self.context.view() {
            view.focus_line(line);
        }
    }
}
