#![forbid(unsafe_code)]

//! Test doubles for surfaces and hook recording.
//!
//! Enabled for this crate's own tests and, for downstream crates, through
//! the `test-helpers` feature.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::geometry::Rect;
use crate::view::Surface;

/// A [`Surface`] that records focus moves.
#[derive(Debug)]
pub struct RecordingSurface {
    name: String,
    bounds: Rect,
    line_count: AtomicUsize,
    focused: Mutex<Vec<usize>>,
}

impl RecordingSurface {
    /// Create a surface with the given view name and an 80x24 bounds.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Rect::new(0, 0, 80, 24),
            line_count: AtomicUsize::new(0),
            focused: Mutex::new(Vec::new()),
        }
    }

    /// Override the bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the reported line count.
    pub fn set_line_count(&self, n: usize) {
        self.line_count.store(n, Ordering::Relaxed);
    }

    /// Every line index passed to [`Surface::focus_line`], in order.
    #[must_use]
    pub fn focused_lines(&self) -> Vec<usize> {
        self.focused
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Surface for RecordingSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn line_count(&self) -> usize {
        self.line_count.load(Ordering::Relaxed)
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn focus_line(&self, line_idx: usize) {
        self.focused
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line_idx);
    }
}
