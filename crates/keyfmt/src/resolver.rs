//! Converts tokenized template parts into compiled elements.
//!
//! The resolver owns the per-part logic: collapsing boundary escapes in
//! literals, splitting an element token into name and attributes, expanding
//! the `@` parameter shorthand, and dispatching to the registered factory.
//! Unknown element names do not fail — the whole token degrades to literal
//! text, exactly as it was written.

use std::sync::Arc;

use keyfmt_parser::{tokenize, Boundaries, TemplatePart};
use tracing::trace;

use crate::attrs::Attrs;
use crate::element::Element;
use crate::error::FormatError;
use crate::formatter::Template;
use crate::registry::ElementRegistry;

/// Leading sigil marking the parameter shorthand: `{@name=value}` is
/// equivalent to `{parameter?name=name&value=value}`.
pub const PARAMETER_SIGIL: char = '@';

/// Resolves [`TemplatePart`]s against an element registry.
pub struct Resolver<'a> {
    registry: &'a ElementRegistry,
    boundaries: &'a Boundaries,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over a registry and boundary configuration.
    pub fn new(registry: &'a ElementRegistry, boundaries: &'a Boundaries) -> Self {
        Self {
            registry,
            boundaries,
        }
    }

    /// Resolves one part into an element.
    ///
    /// Literal parts become static text with escapes collapsed. Element
    /// parts are split into name and attributes and dispatched to their
    /// factory; unregistered names become static text carrying the raw
    /// token verbatim, boundaries included.
    pub fn resolve(&self, part: &TemplatePart) -> Result<Element, FormatError> {
        if !part.is_element() {
            return Ok(Element::static_text(self.unescape(part.raw())));
        }

        let inner = self.unescape(part.inner());
        let (name, attrs) = self.split(&inner);

        match self.registry.resolve(&name) {
            Some(factory) => {
                trace!(element = %name, "resolving element");
                let ctx = ResolveContext {
                    element: &name,
                    attrs: &attrs,
                    text: &inner,
                    resolver: self,
                };
                factory(&ctx)
            }
            None => {
                trace!(token = part.raw(), "unregistered element, keeping literal text");
                Ok(Element::static_text(part.raw()))
            }
        }
    }

    /// Compiles a template string into an immutable [`Template`].
    ///
    /// This is the uncached path; [`Formatter::compile`] layers the element
    /// cache on top of it.
    ///
    /// [`Formatter::compile`]: crate::Formatter::compile
    pub fn compile(&self, template: &str) -> Result<Template, FormatError> {
        let elements = tokenize(template, self.boundaries)
            .iter()
            .map(|part| self.resolve(part).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Template::new(elements))
    }

    /// Collapses start- and end-boundary escapes.
    fn unescape(&self, text: &str) -> String {
        self.boundaries
            .end
            .unescape(&self.boundaries.start.unescape(text))
    }

    /// Splits an element token's inner text into name and attribute set.
    fn split(&self, inner: &str) -> (String, Attrs) {
        if let Some(shorthand) = inner.strip_prefix(PARAMETER_SIGIL) {
            // `@name=value`: the literal text supplies the attributes.
            let attrs = match shorthand.split_once('=') {
                Some((name, value)) => Attrs::from_pairs([("name", name), ("value", value)]),
                None => Attrs::from_pairs([("name", shorthand)]),
            };
            return ("parameter".to_string(), attrs);
        }

        let attribute = &self.boundaries.attribute;
        match attribute.find(inner, 0) {
            Some(i) => (
                inner[..i].to_string(),
                Attrs::parse(&inner[i + attribute.len()..]),
            ),
            None => (inner.to_string(), Attrs::new()),
        }
    }
}

/// Everything a factory sees when building an element: the resolved name,
/// the parsed attributes, the raw token text, and a handle for compiling
/// nested templates.
///
/// Factories consume attributes first and fall back to the raw text where
/// that is their contract; the priority order lives in each factory, in
/// ordinary code.
pub struct ResolveContext<'a> {
    element: &'a str,
    attrs: &'a Attrs,
    text: &'a str,
    resolver: &'a Resolver<'a>,
}

impl ResolveContext<'_> {
    /// The resolved element name.
    pub fn name(&self) -> &str {
        self.element
    }

    /// The parsed attribute set.
    pub fn attrs(&self) -> &Attrs {
        self.attrs
    }

    /// The token's inner text as written (escapes collapsed), name and
    /// attribute string included.
    pub fn text(&self) -> &str {
        self.text
    }

    /// Compiles a nested template with the same registry and boundaries.
    ///
    /// Used by elements whose attribute values may themselves embed
    /// element references. Configuration errors inside the nested template
    /// surface at compile time like any other.
    pub fn compile_nested(&self, template: &str) -> Result<Template, FormatError> {
        self.resolver.compile(template)
    }
}
