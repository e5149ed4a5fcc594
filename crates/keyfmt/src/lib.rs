//! # keyfmt — Keyword-Based String Formatting
//!
//! `keyfmt` renders template strings that embed named elements between
//! configurable boundary delimiters:
//!
//! ```text
//! Hello {value}!  logged at {datetime?format=%H:%M} [{thread}]
//! ```
//!
//! ## Core Concepts
//!
//! - [`Formatter`]: compiles templates and renders them against data
//! - [`Template`]: an immutable compiled template, reusable and thread-safe
//! - [`Element`]: a unit of output — static text or a dynamic render function
//! - [`ElementRegistry`]: the name-to-factory mapping consulted during
//!   compilation; build one explicitly and hand it to the formatter
//! - [`Boundaries`]: the `(start, end, attribute)` delimiter triple, with
//!   escape-by-doubling as the default (`{{` is a literal `{`)
//!
//! ## Quick Start
//!
//! ```rust
//! use keyfmt::Formatter;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Event {
//!     level: String,
//!     message: String,
//! }
//!
//! let formatter = Formatter::new();
//! let template = formatter
//!     .compile("{parameter?name=level}: {parameter?name=message}")
//!     .unwrap();
//!
//! let line = template.render(&Event {
//!     level: "warn".into(),
//!     message: "disk low".into(),
//! }).unwrap();
//! assert_eq!(line, "warn: disk low");
//! ```
//!
//! ## Template Syntax
//!
//! - `{name}` — render the element registered under `name`
//! - `{name?attr=value&other=value}` — configure it with query-string
//!   attributes (percent-encoded values)
//! - `{@param=fallback}` — parameter shorthand, equivalent to
//!   `{parameter?name=param&value=fallback}`
//! - `{{` and `}}` — escaped braces, rendered as literal `{` and `}`
//!
//! Unknown element names never fail: the token renders as written, making
//! templates robust against stray braces.
//!
//! ## Custom Elements
//!
//! ```rust
//! use keyfmt::{Element, ElementRegistry, Formatter};
//!
//! let mut registry = ElementRegistry::with_builtins();
//! registry
//!     .register("bang", |ctx| {
//!         let count: usize = ctx
//!             .attrs()
//!             .convert(ctx.name(), &["count", "c"], |v| v.parse().ok())?
//!             .unwrap_or(1);
//!         Ok(Element::static_text("!".repeat(count)))
//!     })
//!     .unwrap();
//!
//! let formatter = Formatter::with_registry(registry);
//! assert_eq!(formatter.render("wow{bang?count=3}", &()).unwrap(), "wow!!!");
//! ```

mod attrs;
mod builtin;
mod cache;
mod element;
mod error;
mod formatter;
mod registry;
mod resolver;
mod value;

pub use attrs::Attrs;
pub use cache::{ElementCache, DEFAULT_CACHE_CAPACITY};
pub use element::{Element, RenderFn};
pub use error::FormatError;
pub use formatter::{Formatter, Template};
pub use registry::{ElementFactory, ElementRegistry};
pub use resolver::{ResolveContext, Resolver, PARAMETER_SIGIL};
pub use value::{display, resolve_path, NumberFormat};

// Boundary configuration comes from the parser crate; re-exported so most
// consumers only depend on `keyfmt`.
pub use keyfmt_parser::{
    tokenize, Boundaries, Boundary, BoundaryError, Escape, EscapePosition, PartKind, TemplatePart,
    Tokenizer,
};
