#![forbid(unsafe_code)]

//! Keybinding layers and their composition.
//!
//! Each feature controller contributes a *layer*: a function that, given the
//! current [`KeybindingsOpts`], produces the bindings it wants active on a
//! context. A context keeps its layers in registration order and composes
//! them with [`compose_layers`].
//!
//! # Invariants
//!
//! 1. Composition visits layers in **reverse registration order**, so the
//!    most recently registered layer's bindings come first.
//! 2. Consumers resolve a trigger by scanning front-to-back and taking the
//!    first match ([`resolve_binding`]). Together with (1), a later layer
//!    overrides an earlier one on duplicate keys without removing it.
//! 3. Every layer sees the same options value.
//! 4. No layers yields no bindings; composition never fails.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

use crate::error::{HandlerResult, ParseKeyError};
use crate::key::{Key, MouseTrigger};

/// Handler run when a key binding fires.
pub type BindingHandler = Arc<dyn Fn() -> HandlerResult + Send + Sync>;

/// Handler run when a mouse binding fires.
pub type MouseHandler = Arc<dyn Fn(MouseBindingOpts) -> HandlerResult + Send + Sync>;

/// A keybinding layer contributed by one controller.
pub type KeybindingsFn = Arc<dyn Fn(&KeybindingsOpts) -> Vec<Binding> + Send + Sync>;

/// A mouse keybinding layer contributed by one controller.
pub type MouseKeybindingsFn = Arc<dyn Fn(&KeybindingsOpts) -> Vec<MouseBinding> + Send + Sync>;

/// A key-to-action binding.
#[derive(Clone)]
pub struct Binding {
    /// View the binding applies to; empty for global bindings.
    pub view_name: String,
    /// Trigger key. `None` for menu-only actions without a key.
    pub key: Option<Key>,
    /// Action to run.
    pub handler: BindingHandler,
    /// Short description shown in help and the options bar.
    pub description: String,
    /// Whether the binding is advertised in the options bar.
    pub display_on_screen: bool,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("view_name", &self.view_name)
            .field("key", &self.key)
            .field("description", &self.description)
            .field("display_on_screen", &self.display_on_screen)
            .finish_non_exhaustive()
    }
}

impl Binding {
    /// Create a binding for `key`.
    pub fn new<F>(key: Option<Key>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn() -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            view_name: String::new(),
            key,
            handler: Arc::new(handler),
            description: description.into(),
            display_on_screen: false,
        }
    }

    /// Scope the binding to a view.
    #[must_use]
    pub fn with_view_name(mut self, view_name: impl Into<String>) -> Self {
        self.view_name = view_name.into();
        self
    }

    /// Advertise the binding in the options bar.
    #[must_use]
    pub fn displayed(mut self) -> Self {
        self.display_on_screen = true;
        self
    }

    /// Run the handler.
    pub fn invoke(&self) -> HandlerResult {
        (self.handler)()
    }
}

/// Terminal position of a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseBindingOpts {
    /// Absolute column.
    pub x: u16,
    /// Absolute row.
    pub y: u16,
}

/// A pointer-to-action binding.
#[derive(Clone)]
pub struct MouseBinding {
    /// View the pointer event must land in.
    pub view_name: String,
    /// Only fire while this view is focused, if set.
    pub focused_view: Option<String>,
    /// Pointer trigger.
    pub trigger: MouseTrigger,
    /// Action to run.
    pub handler: MouseHandler,
}

impl fmt::Debug for MouseBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MouseBinding")
            .field("view_name", &self.view_name)
            .field("focused_view", &self.focused_view)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

impl MouseBinding {
    /// Create a mouse binding on `view_name`.
    pub fn new<F>(view_name: impl Into<String>, trigger: MouseTrigger, handler: F) -> Self
    where
        F: Fn(MouseBindingOpts) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            view_name: view_name.into(),
            focused_view: None,
            trigger,
            handler: Arc::new(handler),
        }
    }

    /// Require `view` to be focused for the binding to fire.
    #[must_use]
    pub fn when_focused(mut self, view: impl Into<String>) -> Self {
        self.focused_view = Some(view.into());
        self
    }
}

/// User keymap: action name to trigger key.
#[derive(Debug, Clone, Default)]
pub struct KeyConfig {
    keys: AHashMap<String, Key>,
}

impl KeyConfig {
    /// Empty keymap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a keymap from `(action, label)` pairs.
    ///
    /// Fails on the first label that does not parse.
    pub fn from_labels<'a, I>(pairs: I) -> Result<Self, ParseKeyError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut keys = AHashMap::new();
        for (action, label) in pairs {
            keys.insert(action.to_owned(), label.parse()?);
        }
        Ok(Self { keys })
    }

    /// Bind `action` to `key`, replacing any previous key.
    pub fn insert(&mut self, action: impl Into<String>, key: Key) {
        self.keys.insert(action.into(), key);
    }

    /// Key configured for `action`.
    #[must_use]
    pub fn get(&self, action: &str) -> Option<Key> {
        self.keys.get(action).copied()
    }
}

/// Options handed to every keybinding layer.
#[derive(Debug, Clone, Default)]
pub struct KeybindingsOpts {
    /// The active keymap.
    pub config: Arc<KeyConfig>,
}

impl KeybindingsOpts {
    /// Options backed by `config`.
    #[must_use]
    pub fn new(config: Arc<KeyConfig>) -> Self {
        Self { config }
    }

    /// Key bound to `action` in the active keymap.
    #[must_use]
    pub fn key(&self, action: &str) -> Option<Key> {
        self.config.get(action)
    }
}

/// Concatenate the output of every layer, most recent layer first.
pub fn compose_layers<T>(
    layers: &[Arc<dyn Fn(&KeybindingsOpts) -> Vec<T> + Send + Sync>],
    opts: &KeybindingsOpts,
) -> Vec<T> {
    let mut out = Vec::new();
    for layer in layers.iter().rev() {
        out.extend(layer(opts));
    }
    out
}

/// First binding triggered by `key`, scanning front-to-back.
#[must_use]
pub fn resolve_binding(bindings: &[Binding], key: Key) -> Option<&Binding> {
    bindings.iter().find(|b| b.key == Some(key))
}

/// First mouse binding on `view_name` triggered by `trigger`.
///
/// `focused_view` is the name of the currently focused view; bindings that
/// require a different focused view are skipped.
#[must_use]
pub fn resolve_mouse_binding<'a>(
    bindings: &'a [MouseBinding],
    view_name: &str,
    trigger: MouseTrigger,
    focused_view: &str,
) -> Option<&'a MouseBinding> {
    bindings.iter().find(|b| {
        b.view_name == view_name
            && b.trigger == trigger
            && b.focused_view.as_deref().is_none_or(|v| v == focused_view)
    })
}
