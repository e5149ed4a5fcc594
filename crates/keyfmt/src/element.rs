//! The element model: the unit of template output.
//!
//! An element is either *static* (its text is fixed once the template is
//! compiled) or *dynamic* (its text is recomputed from the caller-supplied
//! data value on every render). The two kinds are a closed enum; adding a
//! new element means registering a factory that builds one of these
//! variants, not implementing a new type.

use std::fmt;

use serde_json::Value;

use crate::error::FormatError;

/// A render function for dynamic elements.
///
/// Implementations must tolerate `Value::Null`, which stands for an absent
/// data object. Blanket-implemented for matching closures.
pub trait RenderFn: Send + Sync {
    /// Produces the element's output for this render call.
    fn render(&self, data: &Value) -> Result<String, FormatError>;
}

impl<F> RenderFn for F
where
    F: Fn(&Value) -> Result<String, FormatError> + Send + Sync,
{
    fn render(&self, data: &Value) -> Result<String, FormatError> {
        self(data)
    }
}

/// A compiled template element.
pub enum Element {
    /// Fixed text, resolved once at compile time.
    Static(String),
    /// Output recomputed from the data value on every render.
    Dynamic(Box<dyn RenderFn>),
}

impl Element {
    /// Creates a static element from fixed text.
    pub fn static_text(text: impl Into<String>) -> Self {
        Element::Static(text.into())
    }

    /// Creates a dynamic element from a render function.
    pub fn dynamic<F>(render: F) -> Self
    where
        F: Fn(&Value) -> Result<String, FormatError> + Send + Sync + 'static,
    {
        Element::Dynamic(Box::new(render))
    }

    /// Returns true for static elements.
    pub fn is_static(&self) -> bool {
        matches!(self, Element::Static(_))
    }

    /// Returns true for dynamic elements.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Element::Dynamic(_))
    }

    /// Returns the fixed text of a static element.
    pub fn static_value(&self) -> Option<&str> {
        match self {
            Element::Static(text) => Some(text),
            Element::Dynamic(_) => None,
        }
    }

    /// Produces this element's output for the given data value.
    ///
    /// Static elements ignore the data entirely.
    pub fn render(&self, data: &Value) -> Result<String, FormatError> {
        match self {
            Element::Static(text) => Ok(text.clone()),
            Element::Dynamic(render) => render.render(data),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Element::Dynamic(_) => f.debug_tuple("Dynamic").field(&"..").finish(),
        }
    }
}
