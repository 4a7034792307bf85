#![forbid(unsafe_code)]

//! Focus navigation over contexts.
//!
//! [`ContextStack`] keeps the ordered sequence of active contexts; the top
//! entry is the focused one. Pushing and popping dispatch the focus-lost and
//! focus-gained hooks of the contexts involved.
//!
//! # Invariants
//!
//! 1. Focus-lost hooks of the outgoing context finish before focus-gained
//!    hooks of the incoming context start.
//! 2. Focus-lost is only dispatched to a context that was on the stack.
//! 3. One push dispatches focus-gained exactly once. Re-pushing the current
//!    context re-runs its focus-gained hooks without a focus-lost.
//! 4. The stack lock is released before any hook runs, so hooks may push or
//!    pop re-entrantly.
//!
//! # Stacking policy
//!
//! | Pushed kind | Effect on the stack |
//! |-------------|---------------------|
//! | `Side`, `Global` | stack becomes `[context]` |
//! | anything else | superseded transient top removed, earlier occurrence of the same key removed, context appended |
//!
//! Non-focusable contexts are never pushed.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::context::{Context, ContextKey, ContextKind, OnFocusLostOpts, OnFocusOpts};

/// Ordered sequence of active contexts.
#[derive(Debug, Default)]
pub struct ContextStack {
    stack: Mutex<Vec<Arc<Context>>>,
}

impl ContextStack {
    /// Empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Arc<Context>>> {
        self.stack.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `context` the current context.
    ///
    /// The previous top (if different) receives focus-lost; then `context`
    /// receives focus-gained with `opts`.
    pub fn push(&self, context: &Arc<Context>, opts: OnFocusOpts) {
        let key = context.key();
        if !context.is_focusable() {
            tracing::debug!(target: "ctxnav.stack", context = %key, "ignoring push of non-focusable context");
            return;
        }

        let _span = tracing::debug_span!("stack.push", context = %key).entered();

        let previous = {
            let mut stack = self.entries();
            let previous = stack.last().cloned();
            match context.kind() {
                ContextKind::Side | ContextKind::Global => stack.clear(),
                _ => {
                    if stack
                        .last()
                        .is_some_and(|top| top.is_transient() && top.key() != key)
                    {
                        stack.pop();
                    }
                    stack.retain(|c| c.key() != key);
                }
            }
            stack.push(Arc::clone(context));
            previous
        };

        if let Some(previous) = previous.filter(|p| p.key() != key) {
            tracing::debug!(target: "ctxnav.stack", from = %previous.key(), to = %key, "focus moved");
            previous.handle_focus_lost(&OnFocusLostOpts {
                new_context_key: Some(key),
            });
        }
        context.handle_focus(&opts);
    }

    /// Remove the current context and focus the one beneath it.
    ///
    /// The last remaining context is never popped; returns `None` then.
    pub fn pop(&self) -> Option<Arc<Context>> {
        let (popped, new_top) = {
            let mut stack = self.entries();
            if stack.len() <= 1 {
                return None;
            }
            let popped = stack.pop()?;
            (popped, stack.last().cloned())
        };

        tracing::debug!(target: "ctxnav.stack", context = %popped.key(), "popped");
        popped.handle_focus_lost(&OnFocusLostOpts {
            new_context_key: new_top.as_ref().map(|c| c.key()),
        });
        if let Some(top) = new_top {
            top.handle_focus(&OnFocusOpts::default());
        }
        Some(popped)
    }

    /// The current context, without side effects.
    pub fn current_static(&self) -> Option<Arc<Context>> {
        self.entries().last().cloned()
    }

    /// Key of the current context.
    pub fn current_key(&self) -> Option<ContextKey> {
        self.entries().last().map(|c| c.key())
    }

    /// Whether `key` is the current context.
    pub fn is_current(&self, key: ContextKey) -> bool {
        self.current_key() == Some(key)
    }

    /// Number of contexts on the stack.
    pub fn depth(&self) -> usize {
        self.entries().len()
    }

    /// Keys from bottom to top.
    pub fn keys(&self) -> Vec<ContextKey> {
        self.entries().iter().map(|c| c.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NewContextOpts;

    type Log = Arc<Mutex<Vec<String>>>;

    fn ctx(kind: ContextKind, key: &'static str, log: &Log) -> Arc<Context> {
        make(NewContextOpts::new(kind, ContextKey::new(key)).focusable(), log)
    }

    fn make(opts: NewContextOpts, log: &Log) -> Arc<Context> {
        let c = Arc::new(Context::new(opts));
        let key = c.key();
        let gained = Arc::clone(log);
        c.add_on_focus_fn(Some(Arc::new(move |o: &OnFocusOpts| {
            gained
                .lock()
                .unwrap()
                .push(format!("+{key}:{:?}", o.clicked_view_line_idx));
        })));
        let lost = Arc::clone(log);
        c.add_on_focus_lost_fn(Some(Arc::new(move |o: &OnFocusLostOpts| {
            let to = o.new_context_key.map_or("-", ContextKey::as_str);
            lost.lock().unwrap().push(format!("-{key}>{to}"));
        })));
        c
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    #[test]
    fn lost_before_gained() {
        let log = Log::default();
        let stack = ContextStack::new();
        let files = ctx(ContextKind::Side, "files", &log);
        let staging = ctx(ContextKind::Main, "staging", &log);

        stack.push(&files, OnFocusOpts::default());
        assert_eq!(take(&log), ["+files:None"]);

        stack.push(&staging, OnFocusOpts::clicked("main", 4));
        assert_eq!(take(&log), ["-files>staging", "+staging:Some(4)"]);
        assert!(stack.is_current(ContextKey::new("staging")));
    }

    #[test]
    fn repush_current_refocuses_without_loss() {
        let log = Log::default();
        let stack = ContextStack::new();
        let staging = ctx(ContextKind::Main, "staging", &log);
        stack.push(&staging, OnFocusOpts::default());
        take(&log);

        stack.push(&staging, OnFocusOpts::default());
        assert_eq!(take(&log), ["+staging:None"]);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn non_focusable_ignored() {
        let log = Log::default();
        let stack = ContextStack::new();
        let display = make(
            NewContextOpts::new(ContextKind::Display, ContextKey::new("status")),
            &log,
        );
        stack.push(&display, OnFocusOpts::default());
        assert!(take(&log).is_empty());
        assert!(stack.current_static().is_none());
    }

    #[test]
    fn side_push_resets_stack() {
        let log = Log::default();
        let stack = ContextStack::new();
        let files = ctx(ContextKind::Side, "files", &log);
        let staging = ctx(ContextKind::Main, "staging", &log);
        let menu = ctx(ContextKind::PersistentPopup, "confirm", &log);
        stack.push(&files, OnFocusOpts::default());
        stack.push(&staging, OnFocusOpts::default());
        stack.push(&menu, OnFocusOpts::default());
        take(&log);

        stack.push(&files, OnFocusOpts::default());
        // Only the top loses focus; staging was never current again.
        assert_eq!(take(&log), ["-confirm>files", "+files:None"]);
        assert_eq!(stack.keys(), [ContextKey::new("files")]);
    }

    #[test]
    fn transient_top_is_dropped_when_superseded() {
        let log = Log::default();
        let stack = ContextStack::new();
        let files = ctx(ContextKind::Side, "files", &log);
        let suggestions = make(
            NewContextOpts::new(ContextKind::TemporaryPopup, ContextKey::new("suggestions"))
                .focusable()
                .transient(),
            &log,
        );
        let staging = ctx(ContextKind::Main, "staging", &log);

        stack.push(&files, OnFocusOpts::default());
        stack.push(&suggestions, OnFocusOpts::default());
        stack.push(&staging, OnFocusOpts::default());
        assert_eq!(
            stack.keys(),
            [ContextKey::new("files"), ContextKey::new("staging")]
        );
    }

    #[test]
    fn repushing_moves_to_top_without_duplicates() {
        let log = Log::default();
        let stack = ContextStack::new();
        let files = ctx(ContextKind::Side, "files", &log);
        let a = ctx(ContextKind::Main, "a", &log);
        let b = ctx(ContextKind::Main, "b", &log);
        stack.push(&files, OnFocusOpts::default());
        stack.push(&a, OnFocusOpts::default());
        stack.push(&b, OnFocusOpts::default());
        stack.push(&a, OnFocusOpts::default());
        let keys: Vec<_> = stack.keys().iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["files", "b", "a"]);
    }

    #[test]
    fn pop_dispatches_and_keeps_last() {
        let log = Log::default();
        let stack = ContextStack::new();
        let files = ctx(ContextKind::Side, "files", &log);
        let staging = ctx(ContextKind::Main, "staging", &log);
        stack.push(&files, OnFocusOpts::default());
        stack.push(&staging, OnFocusOpts::default());
        take(&log);

        let popped = stack.pop().unwrap();
        assert_eq!(popped.key(), ContextKey::new("staging"));
        assert_eq!(take(&log), ["-staging>files", "+files:None"]);

        assert!(stack.pop().is_none());
        assert!(take(&log).is_empty());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn hooks_may_push_reentrantly() {
        let log = Log::default();
        let stack = Arc::new(ContextStack::new());
        let files = ctx(ContextKind::Side, "files", &log);
        let staging = ctx(ContextKind::Main, "staging", &log);

        // Focusing staging bounces straight back to files.
        let weak_stack = Arc::downgrade(&stack);
        let bounce = Arc::clone(&files);
        staging.add_on_focus_fn(Some(Arc::new(move |_: &OnFocusOpts| {
            if let Some(stack) = weak_stack.upgrade() {
                stack.push(&bounce, OnFocusOpts::default());
            }
        })));

        stack.push(&files, OnFocusOpts::default());
        stack.push(&staging, OnFocusOpts::default());
        assert!(stack.is_current(ContextKey::new("files")));
    }
}
