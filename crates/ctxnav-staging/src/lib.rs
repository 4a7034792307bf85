#![forbid(unsafe_code)]

//! Staging: paired unstaged/staged diff panes for the selected file.
//!
//! # Role in ctxnav
//! `ctxnav-staging` keeps the two staging panes of a file consistent with
//! the working tree. When either pane gains focus, the
//! [`StagingHelper`] fetches both diffs, rebuilds both [`PatchState`]s, and
//! either renders the pair or moves focus to wherever there is content.
//!
//! # Key components
//! - [`Patch`] / [`PatchState`]: parsed diff plus a selection that always
//!   sits on a change line.
//! - [`PatchExplorerContext`]: a pane context and its state behind a mutex.
//! - [`StagingHelper`]: the refresh coordinator.
//! - [`StagingController`]: attaches the helper to the pane contexts.
//! - [`StagingConfig`] / [`ConfigHandle`]: hot-reloadable tunables.
//!
//! # How it fits in the system
//! Git and the terminal stay outside. Hosts implement [`DiffProvider`],
//! [`SelectedFileSource`], and [`MainViewRenderer`] and hand them to the
//! helper through [`StagingCommon`].

pub mod config;
pub mod controller;
pub mod error;
pub mod helper;
pub mod panel;
pub mod patch;
pub mod patch_state;
pub mod provider;

/// Key of the unstaged (main) staging pane.
pub const STAGING_MAIN: ctxnav_core::ContextKey = ctxnav_core::ContextKey::new("staging");
/// Key of the staged (secondary) staging pane.
pub const STAGING_SECONDARY: ctxnav_core::ContextKey =
    ctxnav_core::ContextKey::new("stagingSecondary");

pub use config::{ConfigHandle, StagingConfig};
pub use controller::StagingController;
pub use error::{ConfigError, DiffError, StagingError};
pub use helper::{RefreshOutcome, StagingCommon, StagingHelper};
pub use panel::PatchExplorerContext;
pub use patch::{Hunk, Patch, PatchLine, PatchLineKind};
pub use patch_state::{PatchState, SelectMode, content_to_render};
pub use provider::{
    DiffProvider, DiffRequest, MainViewPair, MainViewRenderer, RefreshMainOpts, RenderTask,
    SelectedFileSource, ViewUpdateOpts, WorkingTreeFile,
};
