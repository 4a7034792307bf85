#![forbid(unsafe_code)]

//! Integration tests for registry-driven focus navigation.
//!
//! # Invariants tested
//!
//! 1. Focus-lost for the outgoing context completes before focus-gained for
//!    the incoming context begins.
//! 2. Hooks registered by several controllers all observe a transfer, in
//!    registration order.
//! 3. Focus transfers are logged on the `ctxnav.stack` target.
//! 4. Wiring violations surface as panics naming the slot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ctxnav_core::testing::RecordingSurface;
use ctxnav_core::{
    Context, ContextKey, ContextKind, ContextRegistry, ContextStack, NewContextOpts,
    OnFocusLostOpts, OnFocusOpts,
};
use tracing_subscriber::layer::SubscriberExt;

const FILES: ContextKey = ContextKey::new("files");
const STAGING: ContextKey = ContextKey::new("staging");
const STAGING_SECONDARY: ContextKey = ContextKey::new("staging_secondary");

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn registry() -> ContextRegistry {
    let mut b = ContextRegistry::builder();
    b.insert(Arc::new(Context::new(
        NewContextOpts::new(ContextKind::Side, FILES)
            .view(Arc::new(RecordingSurface::new("files")))
            .window_name("files")
            .focusable(),
    )))
    .unwrap();
    for (key, view) in [(STAGING, "staging"), (STAGING_SECONDARY, "stagingSecondary")] {
        b.insert(Arc::new(Context::new(
            NewContextOpts::new(ContextKind::Main, key)
                .view(Arc::new(RecordingSurface::new(view)))
                .window_name("main")
                .focusable()
                .highlight_on_focus(),
        )))
        .unwrap();
    }
    b.build()
}

fn observe(reg: &ContextRegistry, log: &Arc<Mutex<Vec<String>>>, controller: &'static str) {
    for ctx in reg.flatten() {
        let key = ctx.key();
        let gained = Arc::clone(log);
        ctx.add_on_focus_fn(Some(Arc::new(move |_: &OnFocusOpts| {
            gained.lock().unwrap().push(format!("{controller}+{key}"));
        })));
        let lost = Arc::clone(log);
        ctx.add_on_focus_lost_fn(Some(Arc::new(move |_: &OnFocusLostOpts| {
            lost.lock().unwrap().push(format!("{controller}-{key}"));
        })));
    }
}

// Tracing capture, in the same shape as the runtime's effect tests.
#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, f);
    let out = events.lock().unwrap().clone();
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn transfer_runs_all_observers_lost_first() {
    let reg = registry();
    let log = Arc::new(Mutex::new(Vec::new()));
    observe(&reg, &log, "a");
    observe(&reg, &log, "b");

    let stack = ContextStack::new();
    stack.push(reg.get(FILES).unwrap(), OnFocusOpts::default());
    log.lock().unwrap().clear();

    stack.push(reg.get(STAGING).unwrap(), OnFocusOpts::default());
    assert_eq!(
        *log.lock().unwrap(),
        ["a-files", "b-files", "a+staging", "b+staging"]
    );
}

#[test]
fn staging_pair_stacks_over_files() {
    let reg = registry();
    let stack = ContextStack::new();
    stack.push(reg.get(FILES).unwrap(), OnFocusOpts::default());
    stack.push(reg.get(STAGING).unwrap(), OnFocusOpts::default());
    stack.push(reg.get(STAGING_SECONDARY).unwrap(), OnFocusOpts::default());
    assert_eq!(stack.keys(), [FILES, STAGING, STAGING_SECONDARY]);

    stack.pop();
    assert!(stack.is_current(STAGING));
    assert_eq!(
        stack.current_static().unwrap().view_name(),
        "staging"
    );
}

#[test]
fn focus_transfer_is_logged() {
    let reg = registry();
    let stack = ContextStack::new();
    let events = with_captured_events(|| {
        stack.push(reg.get(FILES).unwrap(), OnFocusOpts::default());
        stack.push(reg.get(STAGING).unwrap(), OnFocusOpts::default());
    });

    let moved: Vec<_> = events
        .iter()
        .filter(|e| e.target == "ctxnav.stack" && e.fields.contains_key("from"))
        .collect();
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].fields["from"], "files");
    assert_eq!(moved[0].fields["to"], "staging");
}

#[test]
#[should_panic(expected = "only one controller is allowed to set on_click on context `files`")]
fn duplicate_click_owner_aborts_wiring() {
    let reg = registry();
    let files = reg.get(FILES).unwrap();
    files.add_on_click_fn(Some(Arc::new(|| Ok(()))));
    files.add_on_click_fn(Some(Arc::new(|| Ok(()))));
}
