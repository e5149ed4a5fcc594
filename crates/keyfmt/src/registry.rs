//! The element registry: the name-to-factory mapping used to resolve
//! element references during template compilation.
//!
//! A registry is an explicitly constructed value. Build it, register any
//! custom elements, then hand it to a [`Formatter`](crate::Formatter); the
//! formatter keeps it behind `Arc` and it is effectively immutable from
//! then on. There is no process-wide mutable registry and no lazy
//! population, so resolution can never race with registration.
//!
//! Element names are matched case-sensitively.
//!
//! # Example
//!
//! ```rust
//! use keyfmt::{Element, ElementRegistry, Formatter};
//!
//! let mut registry = ElementRegistry::with_builtins();
//! registry
//!     .register("shout", |ctx| {
//!         let text = ctx.attrs().get_or(&["value", "v"], "").to_uppercase();
//!         Ok(Element::static_text(text))
//!     })
//!     .unwrap();
//!
//! let formatter = Formatter::with_registry(registry);
//! let out = formatter.render("{shout?value=hi}", &()).unwrap();
//! assert_eq!(out, "HI");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::builtin;
use crate::element::Element;
use crate::error::FormatError;
use crate::resolver::ResolveContext;

/// A factory building an [`Element`] from a resolve context.
pub type ElementFactory =
    Arc<dyn Fn(&ResolveContext<'_>) -> Result<Element, FormatError> + Send + Sync>;

/// Mapping from element name to element factory.
#[derive(Clone, Default)]
pub struct ElementRegistry {
    factories: HashMap<String, ElementFactory>,
}

impl ElementRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in element set.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::install(&mut registry);
        debug!(elements = registry.len(), "built default element registry");
        registry
    }

    /// Registers a factory under `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`FormatError::ElementExists`] when the name is already
    /// taken. Use [`register_override`](Self::register_override) to opt in
    /// to replacement.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), FormatError>
    where
        F: Fn(&ResolveContext<'_>) -> Result<Element, FormatError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(FormatError::ElementExists { name });
        }
        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Registers a factory under `name`, replacing any existing
    /// registration.
    pub fn register_override<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ResolveContext<'_>) -> Result<Element, FormatError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Looks up the factory registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<&ElementFactory> {
        self.factories.get(name)
    }

    /// Looks up a factory, failing with [`FormatError::ElementNotFound`]
    /// when absent.
    ///
    /// Template resolution does not use this; it falls back to literal text
    /// for unknown names. This is for callers inspecting a registry
    /// directly.
    pub fn get(&self, name: &str) -> Result<&ElementFactory, FormatError> {
        self.resolve(name).ok_or_else(|| FormatError::ElementNotFound {
            name: name.to_string(),
        })
    }

    /// Returns true when `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the number of registered elements.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Iterates over the registered element names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ElementRegistry")
            .field("elements", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_factory(_: &ResolveContext<'_>) -> Result<Element, FormatError> {
        Ok(Element::static_text(""))
    }

    #[test]
    fn register_and_resolve() {
        let mut registry = ElementRegistry::new();
        registry.register("custom", noop_factory).unwrap();

        assert!(registry.contains("custom"));
        assert!(registry.resolve("custom").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = ElementRegistry::new();
        registry.register("custom", noop_factory).unwrap();

        let err = registry.register("custom", noop_factory).unwrap_err();
        match err {
            FormatError::ElementExists { name } => assert_eq!(name, "custom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn override_replaces() {
        let mut registry = ElementRegistry::new();
        registry.register("custom", noop_factory).unwrap();
        registry.register_override("custom", |_| Ok(Element::static_text("new")));

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut registry = ElementRegistry::new();
        registry.register("Value", noop_factory).unwrap();

        assert!(registry.contains("Value"));
        assert!(!registry.contains("value"));
    }

    #[test]
    fn get_missing_is_not_found_error() {
        let registry = ElementRegistry::new();
        let err = registry.get("ghost").err().expect("expected an error");
        match err {
            FormatError::ElementNotFound { name } => assert_eq!(name, "ghost"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn with_builtins_populates() {
        let registry = ElementRegistry::with_builtins();
        for name in [
            "text",
            "value",
            "parameter",
            "datetime",
            "ticks",
            "timestamp",
            "guid",
            "machineName",
            "appDomain",
            "user",
            "identity",
            "thread",
            "threadName",
        ] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn builtins_can_be_overridden_explicitly() {
        let mut registry = ElementRegistry::with_builtins();

        // Plain register refuses the collision.
        assert!(registry.register("value", noop_factory).is_err());

        // The override form replaces it.
        registry.register_override("value", |_| Ok(Element::static_text("mine")));
        assert!(registry.contains("value"));
    }
}
