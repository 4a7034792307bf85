#![forbid(unsafe_code)]

//! Startup-time registry of well-known contexts.
//!
//! Contexts are process-wide singletons reachable by [`ContextKey`]. The
//! registry is assembled once by [`ContextRegistryBuilder`] during startup
//! and then shared read-only (`Arc<ContextRegistry>`) with every component
//! that needs a lookup.

use std::sync::Arc;

use ahash::AHashMap;

use crate::context::{Context, ContextKey};
use crate::error::ContextError;

/// Collects contexts during startup.
#[derive(Debug, Default)]
pub struct ContextRegistryBuilder {
    order: Vec<Arc<Context>>,
    by_key: AHashMap<ContextKey, usize>,
}

impl ContextRegistryBuilder {
    /// Register `context`. Keys must be unique.
    pub fn insert(&mut self, context: Arc<Context>) -> Result<&mut Self, ContextError> {
        let key = context.key();
        if self.by_key.contains_key(&key) {
            return Err(ContextError::DuplicateKey(key));
        }
        self.by_key.insert(key, self.order.len());
        self.order.push(context);
        Ok(self)
    }

    /// Freeze into a read-only registry.
    #[must_use]
    pub fn build(self) -> ContextRegistry {
        tracing::debug!(target: "ctxnav.context", contexts = self.order.len(), "context registry built");
        ContextRegistry {
            order: self.order,
            by_key: self.by_key,
        }
    }
}

/// Read-only lookup of contexts by key.
#[derive(Debug)]
pub struct ContextRegistry {
    order: Vec<Arc<Context>>,
    by_key: AHashMap<ContextKey, usize>,
}

impl ContextRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> ContextRegistryBuilder {
        ContextRegistryBuilder::default()
    }

    /// Context registered under `key`.
    #[must_use]
    pub fn get(&self, key: ContextKey) -> Option<&Arc<Context>> {
        self.by_key.get(&key).map(|&i| &self.order[i])
    }

    /// Every context in registration order.
    #[must_use]
    pub fn flatten(&self) -> &[Arc<Context>] {
        &self.order
    }

    /// Number of registered contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
