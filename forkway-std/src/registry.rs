//! Named handler registry.
//!
//! Declarative candidate tables refer to handlers by name. The registry maps
//! those names to entries, keeping the declared kind of each handler.

use crate::conditional::{Entry, Group};
use forkway_core::{ErrorMiddleware, Middleware};
use std::collections::HashMap;

/// A lookup table from handler names to entries.
pub struct HandlerRegistry<Req, Res> {
    entries: HashMap<String, Entry<Req, Res>>,
}

impl<Req, Res> HandlerRegistry<Req, Res> {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder<Req, Res> {
        RegistryBuilder::new()
    }

    /// The entry registered under `name`, or [`Entry::Unresolved`] if there is none.
    pub fn resolve(&self, name: &str) -> Entry<Req, Res> {
        self.entries
            .get(name)
            .cloned()
            .unwrap_or_else(|| Entry::Unresolved(name.to_owned()))
    }

    /// Build a group from handler names, in order.
    pub fn group<I>(&self, names: I) -> Group<Req, Res>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.resolve(name.as_ref()))
            .collect()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for constructing a [`HandlerRegistry`].
pub struct RegistryBuilder<Req, Res> {
    entries: HashMap<String, Entry<Req, Res>>,
}

impl<Req, Res> Default for RegistryBuilder<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> RegistryBuilder<Req, Res> {
    /// Create a new empty registry builder.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a raw entry. A later registration replaces an earlier one.
    pub fn entry(mut self, name: impl Into<String>, entry: Entry<Req, Res>) -> Self {
        self.entries.insert(name.into(), entry);
        self
    }

    /// Build the registry.
    pub fn build(self) -> HandlerRegistry<Req, Res> {
        HandlerRegistry {
            entries: self.entries,
        }
    }
}

impl<Req, Res> RegistryBuilder<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// Register an ordinary handler.
    pub fn register<M: Middleware<Req, Res>>(self, name: impl Into<String>, middleware: M) -> Self {
        self.entry(name, Entry::middleware(middleware))
    }

    /// Register an error handler.
    pub fn register_error<E: ErrorMiddleware<Req, Res>>(
        self,
        name: impl Into<String>,
        handler: E,
    ) -> Self {
        self.entry(name, Entry::error_middleware(handler))
    }
}
