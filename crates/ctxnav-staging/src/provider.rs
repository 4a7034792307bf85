#![forbid(unsafe_code)]

//! Collaborators consumed by the staging panels.
//!
//! The staging core never runs git or draws cells itself. It asks a
//! [`DiffProvider`] for diff text, reads the selection of the files list
//! through [`SelectedFileSource`], and hands finished content to a
//! [`MainViewRenderer`].

use std::sync::Arc;

use ctxnav_core::Context;

use crate::error::DiffError;

/// A working-tree file as listed in the files panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingTreeFile {
    /// Repository-relative path.
    pub path: String,
    /// Changes exist between the index and the working tree.
    pub has_unstaged_changes: bool,
    /// Changes exist between HEAD and the index.
    pub has_staged_changes: bool,
}

impl WorkingTreeFile {
    /// Create a file entry.
    pub fn new(path: impl Into<String>, has_unstaged_changes: bool, has_staged_changes: bool) -> Self {
        Self {
            path: path.into(),
            has_unstaged_changes,
            has_staged_changes,
        }
    }

    /// Whether either pane could have something to show.
    #[must_use]
    pub fn has_any_changes(&self) -> bool {
        self.has_unstaged_changes || self.has_staged_changes
    }
}

/// Parameters of one diff request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRequest {
    /// Context lines around each change.
    pub context_lines: u32,
    /// `false`: working tree vs index (unstaged). `true`: index vs HEAD (staged).
    pub cached: bool,
}

/// Produces diff text for a file.
///
/// May be slow; called synchronously on the dispatch thread. An empty
/// string means "no changes". Failures must be reported as errors, never
/// as an empty string.
pub trait DiffProvider: Send + Sync {
    /// Diff `file` according to `request`.
    fn worktree_file_diff(
        &self,
        file: &WorkingTreeFile,
        request: DiffRequest,
    ) -> Result<String, DiffError>;
}

/// The files list the staging panels explore.
pub trait SelectedFileSource: Send + Sync {
    /// The selected file, or `None` when nothing (or a directory) is selected.
    fn selected_file(&self) -> Option<WorkingTreeFile>;

    /// The list's context, focused when the staging panels escape.
    fn context(&self) -> &Arc<Context>;
}

/// A content-producing task for a main view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderTask {
    /// Show a fixed string, keeping the current scroll position.
    StringWithoutScroll(String),
}

impl RenderTask {
    /// The content the task will produce.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::StringWithoutScroll(s) => s,
        }
    }
}

/// Update for one view of a main-view pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewUpdateOpts {
    /// What to render.
    pub task: RenderTask,
    /// View title.
    pub title: String,
}

/// Names of the two views that make up a split main area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainViewPair {
    /// Primary view name.
    pub main: String,
    /// Secondary view name.
    pub secondary: String,
}

/// A paired render request applied atomically to both views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshMainOpts {
    /// Target views.
    pub pair: MainViewPair,
    /// Update for the primary view.
    pub main: ViewUpdateOpts,
    /// Update for the secondary view.
    pub secondary: ViewUpdateOpts,
}

/// Applies paired render requests to the terminal views.
pub trait MainViewRenderer: Send + Sync {
    /// Apply `opts` to both views of the pair as one update.
    fn render_to_main_views(&self, opts: RefreshMainOpts);
}
