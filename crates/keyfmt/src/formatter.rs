//! The formatter: compiles templates and renders them against data.
//!
//! [`Formatter`] ties the pieces together: it owns the element registry
//! (behind `Arc`), the boundary configuration, and the element cache.
//! [`Formatter::compile`] produces an immutable [`Template`] that can be
//! rendered repeatedly — and concurrently — with different data values.

use std::sync::Arc;

use keyfmt_parser::Boundaries;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::cache::{ElementCache, DEFAULT_CACHE_CAPACITY};
use crate::element::Element;
use crate::error::FormatError;
use crate::registry::ElementRegistry;
use crate::resolver::Resolver;

// Shared by every `Formatter::new()`; built once, never mutated.
static DEFAULT_REGISTRY: Lazy<Arc<ElementRegistry>> =
    Lazy::new(|| Arc::new(ElementRegistry::with_builtins()));

/// A compiled template: an immutable sequence of resolved elements.
///
/// Rendering is a pure function of the element sequence and the data value;
/// repeated calls with equal data produce identical output, except for the
/// intentionally time- and identity-dependent built-ins.
#[derive(Debug, Clone)]
pub struct Template {
    parts: Vec<Arc<Element>>,
}

impl Template {
    pub(crate) fn new(parts: Vec<Arc<Element>>) -> Self {
        Self { parts }
    }

    /// Returns the number of compiled parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true for an empty template.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Renders the template with a serializable data value.
    ///
    /// Pass `&()` when there is no data; dynamic elements see
    /// `Value::Null` and must treat it as valid input.
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, FormatError> {
        self.render_value(&serde_json::to_value(data)?)
    }

    /// Renders the template with an already-serialized data value.
    pub fn render_value(&self, data: &Value) -> Result<String, FormatError> {
        let mut out = String::new();
        for part in &self.parts {
            out.push_str(&part.render(data)?);
        }
        Ok(out)
    }
}

/// Compiles and renders keyword-based templates.
///
/// # Example
///
/// ```rust
/// use keyfmt::Formatter;
///
/// let formatter = Formatter::new();
/// let out = formatter.render("Hello {value}!", &"World").unwrap();
/// assert_eq!(out, "Hello World!");
/// ```
///
/// Compile once for repeated rendering:
///
/// ```rust
/// use keyfmt::Formatter;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Entry { level: String, message: String }
///
/// let formatter = Formatter::new();
/// let template = formatter
///     .compile("{parameter?name=level}: {parameter?name=message}")
///     .unwrap();
///
/// let line = template.render(&Entry {
///     level: "warn".into(),
///     message: "disk low".into(),
/// }).unwrap();
/// assert_eq!(line, "warn: disk low");
/// ```
pub struct Formatter {
    registry: Arc<ElementRegistry>,
    boundaries: Boundaries,
    cache: ElementCache,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    /// Creates a formatter with the built-in element set and the default
    /// `{name?attrs}` boundaries.
    pub fn new() -> Self {
        Self {
            registry: Arc::clone(&DEFAULT_REGISTRY),
            boundaries: Boundaries::default(),
            cache: ElementCache::new(DEFAULT_CACHE_CAPACITY),
        }
    }

    /// Creates a formatter around an explicitly constructed registry.
    ///
    /// The registry is immutable from here on; build it completely before
    /// handing it over.
    pub fn with_registry(registry: ElementRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            boundaries: Boundaries::default(),
            cache: ElementCache::new(DEFAULT_CACHE_CAPACITY),
        }
    }

    /// Replaces the boundary configuration.
    pub fn with_boundaries(mut self, boundaries: Boundaries) -> Self {
        self.boundaries = boundaries;
        self
    }

    /// Replaces the element-cache capacity. Zero disables caching.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = ElementCache::new(capacity);
        self
    }

    /// Returns the element registry.
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Returns the boundary configuration.
    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    /// Returns the number of elements currently cached.
    pub fn cached_elements(&self) -> usize {
        self.cache.len()
    }

    /// Escapes boundary delimiters in `text` so it renders verbatim when
    /// embedded in a template.
    pub fn escape(&self, text: &str) -> String {
        self.boundaries
            .end
            .escape_text(&self.boundaries.start.escape_text(text))
    }

    /// Compiles a template into an immutable [`Template`].
    ///
    /// Element tokens are resolved through the cache: identical tokens
    /// repeated across templates share one resolved element.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error: a missing required
    /// attribute, an invalid attribute value, or a factory failure.
    pub fn compile(&self, template: &str) -> Result<Template, FormatError> {
        let parts = keyfmt_parser::tokenize(template, &self.boundaries);
        debug!(
            template_len = template.len(),
            parts = parts.len(),
            "compiling template"
        );

        let resolver = Resolver::new(&self.registry, &self.boundaries);
        let mut elements = Vec::with_capacity(parts.len());
        for part in &parts {
            if part.is_element() {
                if let Some(cached) = self.cache.get(part.raw()) {
                    trace!(token = part.raw(), "element cache hit");
                    elements.push(cached);
                    continue;
                }
                trace!(token = part.raw(), "element cache miss");
                let element = Arc::new(resolver.resolve(part)?);
                self.cache.insert(part.raw().to_string(), Arc::clone(&element));
                elements.push(element);
            } else {
                elements.push(Arc::new(resolver.resolve(part)?));
            }
        }
        Ok(Template::new(elements))
    }

    /// Compiles and renders in one step.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, FormatError> {
        self.compile(template)?.render(data)
    }

    /// Compiles and renders with an already-serialized data value.
    pub fn render_value(&self, template: &str, data: &Value) -> Result<String, FormatError> {
        self.compile(template)?.render_value(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_plain_text() {
        let formatter = Formatter::new();
        assert_eq!(formatter.render("no elements", &()).unwrap(), "no elements");
    }

    #[test]
    fn render_empty_template() {
        let formatter = Formatter::new();
        assert_eq!(formatter.render("", &()).unwrap(), "");
    }

    #[test]
    fn compiled_template_is_reusable() {
        let formatter = Formatter::new();
        let template = formatter.compile("Hello {value}!").unwrap();

        assert_eq!(template.render(&"World").unwrap(), "Hello World!");
        assert_eq!(template.render(&"again").unwrap(), "Hello again!");
    }

    #[test]
    fn null_data_is_valid() {
        let formatter = Formatter::new();
        assert_eq!(formatter.render("x{value}y", &()).unwrap(), "xy");
    }

    #[test]
    fn compile_caches_element_tokens() {
        let formatter = Formatter::new();
        assert_eq!(formatter.cached_elements(), 0);

        formatter.compile("{value} and {value}").unwrap();
        assert_eq!(formatter.cached_elements(), 1);

        formatter.compile("{value?format=N2}").unwrap();
        assert_eq!(formatter.cached_elements(), 2);
    }

    #[test]
    fn cache_capacity_zero_disables() {
        let formatter = Formatter::new().with_cache_capacity(0);
        formatter.compile("{value}").unwrap();
        assert_eq!(formatter.cached_elements(), 0);
    }

    #[test]
    fn custom_boundaries() {
        let boundaries = Boundaries::new(
            keyfmt_parser::Boundary::doubled("<%").unwrap(),
            keyfmt_parser::Boundary::doubled("%>").unwrap(),
            keyfmt_parser::Boundary::new("|").unwrap(),
        );
        let formatter = Formatter::new().with_boundaries(boundaries);

        let out = formatter.render("Hi <%value%>!", &"there").unwrap();
        assert_eq!(out, "Hi there!");
    }

    #[test]
    fn escape_round_trips_through_render() {
        let formatter = Formatter::new();
        let hostile = "a {value} b }end{";
        let escaped = formatter.escape(hostile);
        assert_eq!(formatter.render(&escaped, &()).unwrap(), hostile);
    }

    #[test]
    fn compile_error_surfaces_before_render() {
        let formatter = Formatter::new();
        assert!(formatter.compile("{parameter}").is_err());
    }

    #[test]
    fn concurrent_renders_share_one_template() {
        let formatter = Formatter::new();
        let template = Arc::new(formatter.compile("Hello {value}!").unwrap());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let template = Arc::clone(&template);
                std::thread::spawn(move || {
                    template.render_value(&json!(format!("t{i}"))).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("Hello t{i}!"));
        }
    }
}
