#![forbid(unsafe_code)]

//! Wires the staging helper into its two pane contexts.
//!
//! [`StagingController::attach`] registers a focus-gained observer that
//! refreshes the panes, a keybinding layer for switching panes and
//! returning to the files list, and a mouse layer that selects the clicked
//! line. It also claims the files list's
//! click-focused-main-view slot: clicking one of the two main views while
//! the files list is focused enters the matching pane at the clicked line.
//!
//! Hooks hold the helper weakly; once the helper is dropped they do nothing.

use std::sync::{Arc, Weak};

use ctxnav_core::{
    Binding, ContextError, HandlerResult, Key, KeyCode, KeybindingsOpts, MouseBinding,
    MouseBindingOpts, MouseTrigger, OnFocusOpts,
};

use crate::helper::StagingHelper;
use crate::panel::PatchExplorerContext;

/// Keymap action switching between the two panes.
pub const TOGGLE_PANEL_ACTION: &str = "universal.togglePanel";
/// Keymap action returning focus to the files list.
pub const RETURN_ACTION: &str = "universal.return";

/// Attaches staging behavior to the pane contexts.
#[derive(Debug)]
pub struct StagingController;

impl StagingController {
    /// Attach hooks and keybindings to both panes of `helper`.
    ///
    /// Fails if another controller already owns the files list's
    /// click-focused-main-view slot.
    pub fn attach(helper: &Arc<StagingHelper>) -> Result<(), ContextError> {
        let weak = Arc::downgrade(helper);
        helper
            .files()
            .context()
            .try_add_on_click_focused_main_view_fn(Some(Arc::new(
                move |view_name: &str, line_idx: usize| -> HandlerResult {
                    if let Some(helper) = weak.upgrade() {
                        helper.enter_at(view_name, line_idx);
                    }
                    Ok(())
                },
            )))?;

        for pane in [helper.main(), helper.secondary()] {
            Self::attach_pane(helper, pane);
        }
        Ok(())
    }

    fn attach_pane(helper: &Arc<StagingHelper>, pane: &Arc<PatchExplorerContext>) {
        let context = pane.context();

        let weak = Arc::downgrade(helper);
        context.add_on_focus_fn(Some(Arc::new(move |opts: &OnFocusOpts| {
            let Some(helper) = weak.upgrade() else {
                return;
            };
            if let Err(err) = helper.refresh_staging_panel(opts) {
                tracing::warn!(target: "ctxnav.staging", error = %err, "staging refresh failed");
            }
        })));

        let weak = Arc::downgrade(helper);
        let view_name = context.view_name().to_string();
        context.add_keybindings_fn(Arc::new(move |opts: &KeybindingsOpts| {
            Self::bindings(&weak, &view_name, opts)
        }));

        let weak = Arc::downgrade(helper);
        let target = Arc::downgrade(pane);
        let view_name = context.view_name().to_string();
        context.add_mouse_keybindings_fn(Arc::new(move |_: &KeybindingsOpts| {
            let weak = Weak::clone(&weak);
            let target = Weak::clone(&target);
            vec![MouseBinding::new(
                view_name.clone(),
                MouseTrigger::Left,
                move |opts: MouseBindingOpts| -> HandlerResult {
                    if let (Some(helper), Some(pane)) = (weak.upgrade(), target.upgrade()) {
                        helper.click_line(&pane, opts.y);
                    }
                    Ok(())
                },
            )]
        }));
    }

    fn bindings(
        helper: &Weak<StagingHelper>,
        view_name: &str,
        opts: &KeybindingsOpts,
    ) -> Vec<Binding> {
        let toggle = Weak::clone(helper);
        let escape = Weak::clone(helper);
        vec![
            Binding::new(
                opts.key(TOGGLE_PANEL_ACTION)
                    .or(Some(Key::new(KeyCode::Tab))),
                "Switch to other panel",
                move || {
                    if let Some(helper) = toggle.upgrade() {
                        helper.toggle_panel();
                    }
                    Ok(())
                },
            )
            .with_view_name(view_name)
            .displayed(),
            Binding::new(
                opts.key(RETURN_ACTION).or(Some(Key::new(KeyCode::Escape))),
                "Return to files panel",
                move || {
                    if let Some(helper) = escape.upgrade() {
                        helper.escape();
                    }
                    Ok(())
                },
            )
            .with_view_name(view_name)
            .displayed(),
        ]
    }
}
