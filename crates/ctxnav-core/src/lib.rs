#![forbid(unsafe_code)]

//! Core: context records, keybinding layers, and focus navigation.
//!
//! # Role in ctxnav
//! `ctxnav-core` owns the per-panel behavior record ([`Context`]) that feature
//! controllers attach to, the rules for composing their keybinding layers,
//! and the [`ContextStack`] that moves focus between panels.
//!
//! # Primary responsibilities
//! - **Context**: identity, capability flags, keybinding layers, single-owner
//!   click/render hooks, focus observers, parent link.
//! - **Keybindings**: reverse-registration composition and first-match
//!   resolution.
//! - **ContextStack**: push/pop with ordered focus-lost/focus-gained dispatch.
//! - **ContextRegistry**: startup-built, read-only lookup by key.
//!
//! # How it fits in the system
//! The terminal engine stays outside: contexts only see it through the
//! [`Surface`] trait. Feature crates such as `ctxnav-staging` build on these
//! types to drive their panels.

pub mod binding;
pub mod context;
pub mod error;
pub mod geometry;
pub mod key;
pub mod logging;
pub mod registry;
pub mod stack;
pub mod view;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use binding::{
    Binding, KeyConfig, KeybindingsFn, KeybindingsOpts, MouseBinding, MouseBindingOpts,
    MouseKeybindingsFn, resolve_binding, resolve_mouse_binding,
};
pub use context::{
    Context, ContextKey, ContextKind, NeedsRerenderOnWidthChange, NewContextOpts, OnFocusLostOpts,
    OnFocusOpts,
};
pub use error::{ContextError, HandlerError, HandlerResult, HookSlot, ParseKeyError};
pub use geometry::Rect;
pub use key::{Key, KeyCode, Modifiers, MouseTrigger};
pub use registry::{ContextRegistry, ContextRegistryBuilder};
pub use stack::ContextStack;
pub use view::{Surface, ViewTrait};
