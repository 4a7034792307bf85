#![forbid(unsafe_code)]

//! Refresh and focus routing for the paired staging panes.
//!
//! [`StagingHelper::refresh_staging_panel`] recomputes both pane states from
//! the file selected in the files list, then decides where focus goes and
//! what the two main views show.
//!
//! # Algorithm
//!
//! 1. **Guard**: neither pane focused → do nothing.
//! 2. **Resolve**: no selected file, or a file without changes → escape.
//! 3. **Compute**: fetch the unstaged and staged diffs.
//! 4. **Lock** main, then secondary.
//! 5. **Rebuild** both states and capture their rendered content.
//! 6. **Unlock** both.
//! 7. **Route**:
//!
//! | Main state | Secondary state | Focused | Result |
//! |------------|-----------------|---------|--------|
//! | empty | empty | any | escape to the files list |
//! | empty | some | main | push secondary |
//! | some | empty | secondary | push main |
//! | otherwise | | | focus selection, one paired render |
//!
//! # Invariants
//!
//! 1. Locks are always taken main-then-secondary.
//! 2. No lock is held across a push: a push runs focus hooks that can call
//!    back into this routine.
//! 3. Both states are rebuilt before anything is rendered, and the rendered
//!    strings are captured under the same locks, so a render never pairs an
//!    old state of one pane with a new state of the other.
//! 4. A diff failure changes neither state nor focus.

use std::sync::Arc;

use ctxnav_core::{ContextKey, ContextStack, OnFocusOpts};

use crate::config::ConfigHandle;
use crate::error::StagingError;
use crate::panel::PatchExplorerContext;
use crate::patch_state::{PatchState, content_to_render};
use crate::provider::{
    DiffProvider, DiffRequest, MainViewPair, MainViewRenderer, RefreshMainOpts, RenderTask,
    SelectedFileSource, ViewUpdateOpts,
};

/// What a refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Neither pane was focused; nothing happened.
    NotInUse,
    /// Nothing to show; focus returned to the files list.
    Escaped,
    /// Focus moved to the pane with content.
    Pushed(ContextKey),
    /// Both panes rendered; focus unchanged.
    Rendered,
}

/// Shared collaborators of the staging helper.
#[derive(Clone)]
pub struct StagingCommon {
    /// Focus navigation.
    pub stack: Arc<ContextStack>,
    /// The files list.
    pub files: Arc<dyn SelectedFileSource>,
    /// Diff source.
    pub diffs: Arc<dyn DiffProvider>,
    /// Paired main-view sink.
    pub renderer: Arc<dyn MainViewRenderer>,
    /// Staging configuration, read on every refresh.
    pub config: ConfigHandle,
}

/// Coordinates the main (unstaged) and secondary (staged) panes.
pub struct StagingHelper {
    c: StagingCommon,
    main: Arc<PatchExplorerContext>,
    secondary: Arc<PatchExplorerContext>,
}

impl std::fmt::Debug for StagingHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingHelper")
            .field("main", &self.main.key())
            .field("secondary", &self.secondary.key())
            .finish_non_exhaustive()
    }
}

impl StagingHelper {
    /// Create a helper over the two panes.
    #[must_use]
    pub fn new(
        c: StagingCommon,
        main: Arc<PatchExplorerContext>,
        secondary: Arc<PatchExplorerContext>,
    ) -> Self {
        Self { c, main, secondary }
    }

    /// The unstaged pane.
    #[must_use]
    pub fn main(&self) -> &Arc<PatchExplorerContext> {
        &self.main
    }

    /// The staged pane.
    #[must_use]
    pub fn secondary(&self) -> &Arc<PatchExplorerContext> {
        &self.secondary
    }

    /// Focus navigation shared with the rest of the UI.
    #[must_use]
    pub fn stack(&self) -> &Arc<ContextStack> {
        &self.c.stack
    }

    /// The files list the panes explore.
    #[must_use]
    pub fn files(&self) -> &Arc<dyn SelectedFileSource> {
        &self.c.files
    }

    fn main_focused(&self) -> bool {
        self.c.stack.is_current(self.main.key())
    }

    fn secondary_focused(&self) -> bool {
        self.c.stack.is_current(self.secondary.key())
    }

    /// Recompute both panes and route focus.
    ///
    /// `focus_opts` carries the clicked line when the refresh comes from a
    /// click inside a pane; the line becomes the focused pane's selection.
    pub fn refresh_staging_panel(
        &self,
        focus_opts: &OnFocusOpts,
    ) -> Result<RefreshOutcome, StagingError> {
        let secondary_focused = self.secondary_focused();
        let main_focused = self.main_focused();

        if !main_focused && !secondary_focused {
            return Ok(RefreshOutcome::NotInUse);
        }

        let _span = tracing::debug_span!(
            "staging.refresh",
            secondary_focused,
            clicked_line = ?focus_opts.clicked_view_line_idx,
        )
        .entered();

        let (main_selected, secondary_selected) = match focus_opts.clicked_view_line_idx {
            Some(idx) if secondary_focused => (None, Some(idx)),
            Some(idx) => (Some(idx), None),
            None => (None, None),
        };

        let file = match self.c.files.selected_file() {
            Some(file) if file.has_any_changes() => file,
            _ => return Ok(self.escape()),
        };

        let config = self.c.config.load();
        let main_diff = self.c.diffs.worktree_file_diff(
            &file,
            DiffRequest {
                context_lines: config.diff_context_size,
                cached: false,
            },
        )?;
        let secondary_diff = self.c.diffs.worktree_file_diff(
            &file,
            DiffRequest {
                context_lines: config.diff_context_size,
                cached: true,
            },
        )?;

        let hunk_mode = config.use_hunk_mode;
        let (main_empty, secondary_empty, main_content, secondary_content) = {
            let mut main_state = self.main.lock_state();
            let mut secondary_state = self.secondary.lock_state();

            let next_main = PatchState::new(
                &main_diff,
                main_selected,
                main_state.as_ref(),
                hunk_mode,
            );
            let next_secondary = PatchState::new(
                &secondary_diff,
                secondary_selected,
                secondary_state.as_ref(),
                hunk_mode,
            );
            *main_state = next_main;
            *secondary_state = next_secondary;

            (
                main_state.is_none(),
                secondary_state.is_none(),
                content_to_render(main_state.as_ref()),
                content_to_render(secondary_state.as_ref()),
            )
        };

        if main_empty && secondary_empty {
            return Ok(self.escape());
        }

        if main_empty && !secondary_focused {
            tracing::debug!(target: "ctxnav.staging", file = %file.path, "no unstaged changes left; focusing staged pane");
            self.c
                .stack
                .push(self.secondary.context(), focus_opts.clone());
            return Ok(RefreshOutcome::Pushed(self.secondary.key()));
        }

        if secondary_empty && secondary_focused {
            tracing::debug!(target: "ctxnav.staging", file = %file.path, "no staged changes left; focusing unstaged pane");
            self.c.stack.push(self.main.context(), focus_opts.clone());
            return Ok(RefreshOutcome::Pushed(self.main.key()));
        }

        if secondary_focused {
            self.secondary.focus_selection();
        } else {
            self.main.focus_selection();
        }

        self.c.renderer.render_to_main_views(RefreshMainOpts {
            pair: MainViewPair {
                main: self.main.context().view_name().to_string(),
                secondary: self.secondary.context().view_name().to_string(),
            },
            main: ViewUpdateOpts {
                task: RenderTask::StringWithoutScroll(main_content),
                title: config.unstaged_title.clone(),
            },
            secondary: ViewUpdateOpts {
                task: RenderTask::StringWithoutScroll(secondary_content),
                title: config.staged_title.clone(),
            },
        });
        tracing::debug!(target: "ctxnav.staging", file = %file.path, "staging panes rendered");

        Ok(RefreshOutcome::Rendered)
    }

    /// Return focus to the files list.
    pub fn escape(&self) -> RefreshOutcome {
        tracing::debug!(target: "ctxnav.staging", "nothing to stage; escaping to files");
        self.c
            .stack
            .push(self.c.files.context(), OnFocusOpts::default());
        RefreshOutcome::Escaped
    }

    /// Enter the pane shown in `view_name` with `line_idx` selected.
    ///
    /// Returns the entered pane's key, or `None` when `view_name` is neither
    /// pane's view.
    pub fn enter_at(&self, view_name: &str, line_idx: usize) -> Option<ContextKey> {
        let target = [&self.main, &self.secondary]
            .into_iter()
            .find(|pane| pane.context().view_name() == view_name)?;
        self.c
            .stack
            .push(target.context(), OnFocusOpts::clicked(view_name, line_idx));
        Some(target.key())
    }

    /// Focus `pane` with the line under terminal row `y` selected.
    ///
    /// Rows outside the pane's view are ignored. Returns the selected line
    /// as requested, before it is snapped to a change.
    pub fn click_line(&self, pane: &PatchExplorerContext, y: u16) -> Option<usize> {
        let context = pane.context();
        let line = context.view_trait()?.line_at_row(y)?;
        self.c
            .stack
            .push(context, OnFocusOpts::clicked(context.view_name(), line));
        Some(line)
    }

    /// Move focus to the other pane if it has content.
    ///
    /// Returns the key of the newly focused pane.
    pub fn toggle_panel(&self) -> Option<ContextKey> {
        let target = if self.secondary_focused() {
            &self.main
        } else if self.main_focused() {
            &self.secondary
        } else {
            return None;
        };
        if !target.has_content() {
            return None;
        }
        self.c.stack.push(target.context(), OnFocusOpts::default());
        Some(target.key())
    }
}
