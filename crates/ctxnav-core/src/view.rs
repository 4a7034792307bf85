#![forbid(unsafe_code)]

//! Renderable surfaces as seen by contexts.
//!
//! The terminal engine owns the real views; a context only holds a
//! [`Surface`] handle and reads it through [`ViewTrait`]. Nothing here writes
//! cells. The one mutation a surface accepts is [`Surface::focus_line`], which
//! moves the view's cursor/origin so a selected line is visible.

use std::fmt;
use std::sync::Arc;

use crate::geometry::Rect;

/// A renderable surface owned by the terminal engine.
pub trait Surface: Send + Sync {
    /// Stable view name (used for mouse routing and main-view pairing).
    fn name(&self) -> &str;

    /// Number of rendered lines currently held by the view.
    fn line_count(&self) -> usize;

    /// Current on-screen bounds of the view.
    fn bounds(&self) -> Rect;

    /// Move the view's focus point to `line_idx`.
    fn focus_line(&self, line_idx: usize);
}

/// Read-only adapter over a [`Surface`].
#[derive(Clone)]
pub struct ViewTrait {
    surface: Arc<dyn Surface>,
}

impl fmt::Debug for ViewTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewTrait")
            .field("name", &self.surface.name())
            .finish()
    }
}

impl ViewTrait {
    /// Wrap a surface.
    #[must_use]
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self { surface }
    }

    /// The wrapped view's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.surface.name()
    }

    /// Total number of lines the view would need to show everything.
    #[must_use]
    pub fn view_lines_height(&self) -> usize {
        self.surface.line_count()
    }

    /// Current bounds of the view.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.surface.bounds()
    }

    /// Content line under the absolute terminal row `y`.
    ///
    /// `None` when the row is outside the view.
    #[must_use]
    pub fn line_at_row(&self, y: u16) -> Option<usize> {
        self.bounds().relative_row(y).map(usize::from)
    }
}
