#![forbid(unsafe_code)]

//! Per-panel behavior records.
//!
//! A [`Context`] is created once per UI panel at startup and lives for the
//! whole process. Feature controllers then attach behavior to it: keybinding
//! layers, focus observers, and the single-owner click/render hooks.
//!
//! # Invariants
//!
//! 1. Identity (`key`, `kind`), the view handle, and the capability flags are
//!    fixed at construction. Only the window name and the attached controller
//!    functions change afterwards.
//! 2. Each single-owner slot holds at most one handler until
//!    [`Context::clear_all_attached_controller_functions`] resets it. A second
//!    claim is a wiring bug: `try_add_*` reports it, `add_*` panics.
//! 3. Hooks run without any lock held, so a hook may register more hooks on,
//!    or re-focus, the same context.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ctxnav_core::context::{Context, ContextKey, ContextKind, NewContextOpts};
//!
//! let ctx = Context::new(
//!     NewContextOpts::new(ContextKind::Side, ContextKey::new("files"))
//!         .window_name("files")
//!         .focusable(),
//! );
//! ctx.add_on_click_fn(Some(Arc::new(|| Ok(()))));
//! assert!(ctx.on_click().is_some());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::binding::{
    Binding, KeybindingsFn, KeybindingsOpts, MouseBinding, MouseKeybindingsFn, compose_layers,
};
use crate::error::{ContextError, HandlerResult, HookSlot};
use crate::view::{Surface, ViewTrait};

/// Process-stable identifier of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey(&'static str);

impl ContextKey {
    /// Key of the surface-less global context.
    pub const GLOBAL: ContextKey = ContextKey("global");

    /// Create a key.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    /// The key as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Category of a context, governing default layout and stacking policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// A list panel in the side column (files, branches, commits).
    Side,
    /// A main content panel (diff, staging).
    Main,
    /// A popup that survives focus moving elsewhere (confirmation prompts).
    PersistentPopup,
    /// A popup that disappears once focus leaves it (menus, suggestions).
    TemporaryPopup,
    /// Auxiliary panels such as the command log.
    Extras,
    /// The surface-less global scope.
    Global,
    /// Display-only panels that never take focus.
    Display,
}

/// When a context must re-render after its view's width changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NeedsRerenderOnWidthChange {
    /// Content does not depend on width.
    #[default]
    Never,
    /// Content always depends on width.
    Always,
    /// Only when the width change alters the content's shape (e.g. a
    /// switch between single-column and multi-column rendering).
    WhenContentShapeChanges,
}

/// Options passed to focus-gained hooks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OnFocusOpts {
    /// Window that was clicked to give focus, if mouse-initiated.
    pub clicked_window_name: Option<String>,
    /// View-relative line that was clicked, if mouse-initiated.
    pub clicked_view_line_idx: Option<usize>,
}

impl OnFocusOpts {
    /// Focus given by a click on `line_idx` of `window_name`.
    #[must_use]
    pub fn clicked(window_name: impl Into<String>, line_idx: usize) -> Self {
        Self {
            clicked_window_name: Some(window_name.into()),
            clicked_view_line_idx: Some(line_idx),
        }
    }
}

/// Options passed to focus-lost hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnFocusLostOpts {
    /// Context that is receiving focus, if any.
    pub new_context_key: Option<ContextKey>,
}

/// Focus-gained observer.
pub type OnFocusFn = Arc<dyn Fn(&OnFocusOpts) + Send + Sync>;
/// Focus-lost observer.
pub type OnFocusLostFn = Arc<dyn Fn(&OnFocusLostOpts) + Send + Sync>;
/// Click handler.
pub type OnClickFn = Arc<dyn Fn() -> HandlerResult + Send + Sync>;
/// Click-inside-focused-main-view handler: `(main_view_name, clicked_line_idx)`.
pub type OnClickFocusedMainViewFn = Arc<dyn Fn(&str, usize) -> HandlerResult + Send + Sync>;
/// Render-selection-to-main-views handler.
pub type OnRenderToMainFn = Arc<dyn Fn() + Send + Sync>;
/// Supplier of the options-bar map (shortcut label to description).
pub type OptionsMapFn = Arc<dyn Fn() -> BTreeMap<String, String> + Send + Sync>;

/// Construction options for [`Context::new`].
#[derive(Clone)]
pub struct NewContextOpts {
    /// Category.
    pub kind: ContextKind,
    /// Identity.
    pub key: ContextKey,
    /// Associated surface; `None` for the global context.
    pub view: Option<Arc<dyn Surface>>,
    /// Layout region the view is placed in.
    pub window_name: String,
    /// Whether the context can take focus.
    pub focusable: bool,
    /// Whether the context leaves navigation history once superseded.
    pub transient: bool,
    /// Negated so that `false` (controlled bounds) is the default.
    pub has_uncontrolled_bounds: bool,
    /// Whether the selection is highlighted while focused.
    pub highlight_on_focus: bool,
    /// Width re-render policy.
    pub needs_rerender_on_width_change: NeedsRerenderOnWidthChange,
    /// Whether a height change requires a re-render.
    pub needs_rerender_on_height_change: bool,
    /// Panel title; empty by default.
    pub title: String,
    /// Options-bar supplier.
    pub on_get_options_map: Option<OptionsMapFn>,
}

impl fmt::Debug for NewContextOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewContextOpts")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("window_name", &self.window_name)
            .finish_non_exhaustive()
    }
}

impl NewContextOpts {
    /// Options with every flag off and no view.
    #[must_use]
    pub fn new(kind: ContextKind, key: ContextKey) -> Self {
        Self {
            kind,
            key,
            view: None,
            window_name: String::new(),
            focusable: false,
            transient: false,
            has_uncontrolled_bounds: false,
            highlight_on_focus: false,
            needs_rerender_on_width_change: NeedsRerenderOnWidthChange::Never,
            needs_rerender_on_height_change: false,
            title: String::new(),
            on_get_options_map: None,
        }
    }

    /// Attach a surface.
    #[must_use]
    pub fn view(mut self, view: Arc<dyn Surface>) -> Self {
        self.view = Some(view);
        self
    }

    /// Set the window name.
    #[must_use]
    pub fn window_name(mut self, window_name: impl Into<String>) -> Self {
        self.window_name = window_name.into();
        self
    }

    /// Mark focusable.
    #[must_use]
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Mark transient.
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Let the view size itself.
    #[must_use]
    pub fn uncontrolled_bounds(mut self) -> Self {
        self.has_uncontrolled_bounds = true;
        self
    }

    /// Highlight the selection while focused.
    #[must_use]
    pub fn highlight_on_focus(mut self) -> Self {
        self.highlight_on_focus = true;
        self
    }

    /// Set the width re-render policy.
    #[must_use]
    pub fn rerender_on_width_change(mut self, level: NeedsRerenderOnWidthChange) -> Self {
        self.needs_rerender_on_width_change = level;
        self
    }

    /// Re-render when the height changes.
    #[must_use]
    pub fn rerender_on_height_change(mut self) -> Self {
        self.needs_rerender_on_height_change = true;
        self
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the options-bar supplier.
    #[must_use]
    pub fn options_map<F>(mut self, f: F) -> Self
    where
        F: Fn() -> BTreeMap<String, String> + Send + Sync + 'static,
    {
        self.on_get_options_map = Some(Arc::new(f));
        self
    }
}

#[derive(Default)]
struct AttachedFns {
    keybindings_fns: Vec<KeybindingsFn>,
    mouse_keybindings_fns: Vec<MouseKeybindingsFn>,
    on_click_fn: Option<OnClickFn>,
    on_click_focused_main_view_fn: Option<OnClickFocusedMainViewFn>,
    on_render_to_main_fn: Option<OnRenderToMainFn>,
    on_focus_fns: Vec<OnFocusFn>,
    on_focus_lost_fns: Vec<OnFocusLostFn>,
}

/// Weak link to a parent context.
///
/// The link is a relation only: the child never keeps its parent alive.
#[derive(Default)]
pub struct ParentLink {
    parent: RwLock<Option<Weak<Context>>>,
}

impl ParentLink {
    /// Point the link at `parent`.
    pub fn set(&self, parent: &Arc<Context>) {
        *self.parent.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::downgrade(parent));
    }

    /// The parent, if set and still alive.
    #[must_use]
    pub fn get(&self) -> Option<Arc<Context>> {
        self.parent
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .and_then(Weak::upgrade)
    }
}

/// Behavior record for one panel.
pub struct Context {
    kind: ContextKind,
    key: ContextKey,
    view: Option<Arc<dyn Surface>>,
    view_trait: Option<ViewTrait>,
    window_name: RwLock<String>,
    title: String,
    on_get_options_map: Option<OptionsMapFn>,

    attached: RwLock<AttachedFns>,

    focusable: bool,
    transient: bool,
    has_controlled_bounds: bool,
    highlight_on_focus: bool,
    needs_rerender_on_width_change: NeedsRerenderOnWidthChange,
    needs_rerender_on_height_change: bool,

    parent: ParentLink,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("view", &self.view_name())
            .field("window_name", &self.window_name())
            .field("focusable", &self.focusable)
            .field("transient", &self.transient)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Build a context from construction options.
    #[must_use]
    pub fn new(opts: NewContextOpts) -> Self {
        let view_trait = opts.view.clone().map(ViewTrait::new);
        Self {
            kind: opts.kind,
            key: opts.key,
            view: opts.view,
            view_trait,
            window_name: RwLock::new(opts.window_name),
            title: opts.title,
            on_get_options_map: opts.on_get_options_map,
            attached: RwLock::new(AttachedFns::default()),
            focusable: opts.focusable,
            transient: opts.transient,
            has_controlled_bounds: !opts.has_uncontrolled_bounds,
            highlight_on_focus: opts.highlight_on_focus,
            needs_rerender_on_width_change: opts.needs_rerender_on_width_change,
            needs_rerender_on_height_change: opts.needs_rerender_on_height_change,
            parent: ParentLink::default(),
        }
    }

    fn attached(&self) -> RwLockReadGuard<'_, AttachedFns> {
        self.attached.read().unwrap_or_else(|e| e.into_inner())
    }

    fn attached_mut(&self) -> RwLockWriteGuard<'_, AttachedFns> {
        self.attached.write().unwrap_or_else(|e| e.into_inner())
    }

    // --- Identity and capabilities ---

    /// Category.
    #[inline]
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Identity.
    #[inline]
    pub fn key(&self) -> ContextKey {
        self.key
    }

    /// Layout region the view currently lives in.
    pub fn window_name(&self) -> String {
        self.window_name
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Move the context into another layout region.
    pub fn set_window_name(&self, window_name: impl Into<String>) {
        *self.window_name.write().unwrap_or_else(|e| e.into_inner()) = window_name.into();
    }

    /// Name of the associated view; empty for the global context.
    pub fn view_name(&self) -> &str {
        self.view.as_deref().map_or("", |v| v.name())
    }

    /// The associated surface.
    pub fn view(&self) -> Option<&Arc<dyn Surface>> {
        self.view.as_ref()
    }

    /// Read-only adapter over the associated surface.
    pub fn view_trait(&self) -> Option<&ViewTrait> {
        self.view_trait.as_ref()
    }

    /// Panel title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Lines the view needs to show all content; 0 without a view.
    pub fn total_content_height(&self) -> usize {
        self.view_trait
            .as_ref()
            .map_or(0, ViewTrait::view_lines_height)
    }

    #[inline]
    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    #[inline]
    pub fn is_transient(&self) -> bool {
        self.transient
    }

    #[inline]
    pub fn has_controlled_bounds(&self) -> bool {
        self.has_controlled_bounds
    }

    #[inline]
    pub fn highlight_on_focus(&self) -> bool {
        self.highlight_on_focus
    }

    #[inline]
    pub fn needs_rerender_on_width_change(&self) -> NeedsRerenderOnWidthChange {
        self.needs_rerender_on_width_change
    }

    #[inline]
    pub fn needs_rerender_on_height_change(&self) -> bool {
        self.needs_rerender_on_height_change
    }

    /// Options-bar entries. A fresh map per call; empty when unset.
    pub fn options_map(&self) -> BTreeMap<String, String> {
        self.on_get_options_map
            .as_ref()
            .map(|f| f())
            .unwrap_or_default()
    }

    /// Own options-bar entries, or the parent's when this context has none.
    pub fn effective_options_map(&self) -> BTreeMap<String, String> {
        let own = self.options_map();
        if !own.is_empty() {
            return own;
        }
        self.parent_context()
            .map(|p| p.effective_options_map())
            .unwrap_or_default()
    }

    // --- Parent link ---

    /// Link this context to `parent`.
    pub fn set_parent_context(&self, parent: &Arc<Context>) {
        self.parent.set(parent);
    }

    /// The parent context, if linked.
    pub fn parent_context(&self) -> Option<Arc<Context>> {
        self.parent.get()
    }

    // --- Keybinding layers ---

    /// Append a keybinding layer.
    pub fn add_keybindings_fn(&self, layer: KeybindingsFn) {
        self.attached_mut().keybindings_fns.push(layer);
    }

    /// Append a mouse keybinding layer.
    pub fn add_mouse_keybindings_fn(&self, layer: MouseKeybindingsFn) {
        self.attached_mut().mouse_keybindings_fns.push(layer);
    }

    /// All bindings, most recently registered layer first.
    pub fn keybindings(&self, opts: &KeybindingsOpts) -> Vec<Binding> {
        let layers = self.attached().keybindings_fns.clone();
        compose_layers(&layers, opts)
    }

    /// All mouse bindings, most recently registered layer first.
    pub fn mouse_keybindings(&self, opts: &KeybindingsOpts) -> Vec<MouseBinding> {
        let layers = self.attached().mouse_keybindings_fns.clone();
        compose_layers(&layers, opts)
    }

    // --- Single-owner hooks ---

    fn claim<T>(
        key: ContextKey,
        slot: HookSlot,
        current: &mut Option<T>,
        value: Option<T>,
    ) -> Result<(), ContextError> {
        let Some(value) = value else {
            return Ok(());
        };
        if current.is_some() {
            return Err(ContextError::DuplicateHook { slot, key });
        }
        *current = Some(value);
        tracing::debug!(target: "ctxnav.context", context = %key, slot = %slot, "hook claimed");
        Ok(())
    }

    /// Claim the click slot. `None` is a no-op.
    pub fn try_add_on_click_fn(&self, f: Option<OnClickFn>) -> Result<(), ContextError> {
        let mut attached = self.attached_mut();
        Self::claim(self.key, HookSlot::OnClick, &mut attached.on_click_fn, f)
    }

    /// Claim the click-focused-main-view slot. `None` is a no-op.
    pub fn try_add_on_click_focused_main_view_fn(
        &self,
        f: Option<OnClickFocusedMainViewFn>,
    ) -> Result<(), ContextError> {
        let mut attached = self.attached_mut();
        Self::claim(
            self.key,
            HookSlot::OnClickFocusedMainView,
            &mut attached.on_click_focused_main_view_fn,
            f,
        )
    }

    /// Claim the render-to-main slot. `None` is a no-op.
    pub fn try_add_on_render_to_main_fn(
        &self,
        f: Option<OnRenderToMainFn>,
    ) -> Result<(), ContextError> {
        let mut attached = self.attached_mut();
        Self::claim(
            self.key,
            HookSlot::OnRenderToMain,
            &mut attached.on_render_to_main_fn,
            f,
        )
    }

    /// Claim the click slot.
    ///
    /// # Panics
    ///
    /// If another controller already owns the slot.
    #[track_caller]
    pub fn add_on_click_fn(&self, f: Option<OnClickFn>) {
        if let Err(err) = self.try_add_on_click_fn(f) {
            contract_violation(&err);
        }
    }

    /// Claim the click-focused-main-view slot.
    ///
    /// # Panics
    ///
    /// If another controller already owns the slot.
    #[track_caller]
    pub fn add_on_click_focused_main_view_fn(&self, f: Option<OnClickFocusedMainViewFn>) {
        if let Err(err) = self.try_add_on_click_focused_main_view_fn(f) {
            contract_violation(&err);
        }
    }

    /// Claim the render-to-main slot.
    ///
    /// # Panics
    ///
    /// If another controller already owns the slot.
    #[track_caller]
    pub fn add_on_render_to_main_fn(&self, f: Option<OnRenderToMainFn>) {
        if let Err(err) = self.try_add_on_render_to_main_fn(f) {
            contract_violation(&err);
        }
    }

    pub fn on_click(&self) -> Option<OnClickFn> {
        self.attached().on_click_fn.clone()
    }

    pub fn on_click_focused_main_view(&self) -> Option<OnClickFocusedMainViewFn> {
        self.attached().on_click_focused_main_view_fn.clone()
    }

    pub fn on_render_to_main(&self) -> Option<OnRenderToMainFn> {
        self.attached().on_render_to_main_fn.clone()
    }

    /// Run the click handler, if any.
    pub fn handle_click(&self) -> HandlerResult {
        match self.on_click() {
            Some(f) => f(),
            None => Ok(()),
        }
    }

    /// Run the click-focused-main-view handler, if any.
    pub fn handle_click_focused_main_view(
        &self,
        main_view_name: &str,
        clicked_line_idx: usize,
    ) -> HandlerResult {
        match self.on_click_focused_main_view() {
            Some(f) => f(main_view_name, clicked_line_idx),
            None => Ok(()),
        }
    }

    /// Run the render-to-main handler, if any.
    pub fn handle_render_to_main(&self) {
        if let Some(f) = self.on_render_to_main() {
            f();
        }
    }

    // --- Focus observers ---

    /// Add a focus-gained observer. `None` is a no-op.
    pub fn add_on_focus_fn(&self, f: Option<OnFocusFn>) {
        if let Some(f) = f {
            self.attached_mut().on_focus_fns.push(f);
        }
    }

    /// Add a focus-lost observer. `None` is a no-op.
    pub fn add_on_focus_lost_fn(&self, f: Option<OnFocusLostFn>) {
        if let Some(f) = f {
            self.attached_mut().on_focus_lost_fns.push(f);
        }
    }

    /// Run focus-gained observers in registration order.
    pub fn handle_focus(&self, opts: &OnFocusOpts) {
        let hooks = self.attached().on_focus_fns.clone();
        for hook in hooks {
            hook(opts);
        }
    }

    /// Run focus-lost observers in registration order.
    pub fn handle_focus_lost(&self, opts: &OnFocusLostOpts) {
        let hooks = self.attached().on_focus_lost_fns.clone();
        for hook in hooks {
            hook(opts);
        }
    }

    /// Drop every layer, observer, and single-owner handler.
    pub fn clear_all_attached_controller_functions(&self) {
        *self.attached_mut() = AttachedFns::default();
        tracing::debug!(target: "ctxnav.context", context = %self.key, "controller functions cleared");
    }
}

#[cold]
#[track_caller]
fn contract_violation(err: &ContextError) -> ! {
    tracing::error!(target: "ctxnav.context", error = %err, "controller wiring contract violated");
    panic!("{err}");
}
