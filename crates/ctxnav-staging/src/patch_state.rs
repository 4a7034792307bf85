#![forbid(unsafe_code)]

//! Explorable per-pane diff state.
//!
//! A [`PatchState`] is rebuilt from scratch on every refresh. Continuity
//! comes from seeding the new state with the previous one's selection, not
//! from mutating the old state.
//!
//! # Selection resolution
//!
//! 1. An explicit line (from a click) wins.
//! 2. Otherwise the previous state's selected line is reused.
//! 3. Otherwise the first change line is selected.
//!
//! The chosen index is clamped to the patch and snapped to the nearest
//! change line, preferring the next one.

use crate::patch::Patch;

/// How much of the patch the selection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// A single change line.
    #[default]
    Line,
    /// The whole hunk around the selected line.
    Hunk,
}

/// Diff content and selection for one staging pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchState {
    patch: Patch,
    selected_line_idx: usize,
    select_mode: SelectMode,
}

impl PatchState {
    /// Build the state for `diff`.
    ///
    /// Returns `None` when the diff has no added or removed lines: the pane
    /// has nothing to show.
    #[must_use]
    pub fn new(
        diff: &str,
        explicit_line_idx: Option<usize>,
        previous: Option<&PatchState>,
        hunk_mode: bool,
    ) -> Option<Self> {
        let patch = Patch::parse(diff);
        let first_change = patch.first_change_idx()?;

        let requested = explicit_line_idx.or_else(|| previous.map(|p| p.selected_line_idx));
        let selected_line_idx = requested
            .and_then(|idx| patch.closest_change_idx(idx))
            .unwrap_or(first_change);

        let select_mode = if hunk_mode {
            SelectMode::Hunk
        } else {
            SelectMode::Line
        };

        Some(Self {
            patch,
            selected_line_idx,
            select_mode,
        })
    }

    /// The parsed patch.
    #[must_use]
    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    /// Selected line index; always a change line.
    #[must_use]
    pub fn selected_line_idx(&self) -> usize {
        self.selected_line_idx
    }

    #[must_use]
    pub fn select_mode(&self) -> SelectMode {
        self.select_mode
    }

    /// Inclusive line range covered by the selection.
    ///
    /// In hunk mode this is the hunk body (header excluded).
    #[must_use]
    pub fn selected_range(&self) -> (usize, usize) {
        match self.select_mode {
            SelectMode::Line => (self.selected_line_idx, self.selected_line_idx),
            SelectMode::Hunk => self
                .patch
                .hunk_containing(self.selected_line_idx)
                .map_or((self.selected_line_idx, self.selected_line_idx), |h| {
                    (h.header_idx + 1, h.end_idx - 1)
                }),
        }
    }

    /// Content for the pane's view.
    #[must_use]
    pub fn render(&self) -> String {
        self.patch.render()
    }
}

/// Rendered content for an optional state; empty when there is no state.
#[must_use]
pub fn content_to_render(state: Option<&PatchState>) -> String {
    state.map(PatchState::render).unwrap_or_default()
}
