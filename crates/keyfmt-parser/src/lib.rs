//! Boundary scanner and tokenizer for keyword-based string templates.
//!
//! This crate splits a template string into an ordered sequence of
//! [`TemplatePart`]s: literal text spans and delimited element references.
//! It knows nothing about what an element *means* — resolving a part into
//! output is the job of the `keyfmt` crate sitting on top.
//!
//! # Example
//!
//! ```rust
//! use keyfmt_parser::{tokenize, Boundaries, PartKind};
//!
//! let parts = tokenize("Hello {value}!", &Boundaries::default());
//!
//! assert_eq!(parts.len(), 3);
//! assert_eq!(parts[0].raw(), "Hello ");
//! assert_eq!(parts[1].kind(), PartKind::Element);
//! assert_eq!(parts[1].raw(), "{value}");
//! assert_eq!(parts[1].inner(), "value");
//! assert_eq!(parts[2].raw(), "!");
//! ```
//!
//! # Syntax
//!
//! The default boundaries are `{` / `}` for element references and `?` for
//! the name/attribute separator, with escaping by doubling: `{{` is a
//! literal `{`, `}}` a literal `}`. All three delimiters (and their escape
//! rules) are configurable via [`Boundaries`].
//!
//! # Guarantees
//!
//! - The parts cover the entire input with no gaps or overlaps:
//!   concatenating [`TemplatePart::raw`] over all parts reproduces the
//!   source string byte for byte.
//! - Literal parts keep their escape sequences intact; collapsing them is a
//!   rendering concern, not a tokenizing one.
//! - A start boundary with no matching end boundary does not error: the
//!   remainder of the input becomes a final literal part.

mod boundary;

pub use boundary::{Boundaries, Boundary, BoundaryError, Escape, EscapePosition};

/// Classification of a [`TemplatePart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// Plain text between element references.
    Literal,
    /// A delimited element reference.
    Element,
}

/// An immutable span of a template: literal text or an element reference.
///
/// Parts are created during tokenization and never mutated. [`raw`] is the
/// span exactly as it appeared in the source, boundaries included for
/// element parts; [`inner`] strips the start/end boundaries from element
/// parts and is the whole span for literals.
///
/// [`raw`]: TemplatePart::raw
/// [`inner`]: TemplatePart::inner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePart {
    kind: PartKind,
    raw: String,
    // Byte range of the inner content within `raw`.
    inner_start: usize,
    inner_end: usize,
}

impl TemplatePart {
    /// Creates a literal part from a raw text span.
    pub fn literal(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let len = raw.len();
        Self {
            kind: PartKind::Literal,
            raw,
            inner_start: 0,
            inner_end: len,
        }
    }

    /// Creates an element part from a raw span and the byte lengths of the
    /// start and end boundaries it carries.
    pub fn element(raw: impl Into<String>, start_len: usize, end_len: usize) -> Self {
        let raw = raw.into();
        let inner_end = raw.len().saturating_sub(end_len).max(start_len);
        Self {
            kind: PartKind::Element,
            inner_start: start_len,
            inner_end,
            raw,
        }
    }

    /// Returns the part classification.
    pub fn kind(&self) -> PartKind {
        self.kind
    }

    /// Returns true for element-reference parts.
    pub fn is_element(&self) -> bool {
        self.kind == PartKind::Element
    }

    /// The span exactly as written in the source, boundaries included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The content between the boundaries for element parts; the whole span
    /// for literals. Escape sequences are left intact.
    pub fn inner(&self) -> &str {
        &self.raw[self.inner_start..self.inner_end]
    }
}

/// Splits a template into parts, honoring the boundary escape rules.
///
/// The tokenizer is an iterator; [`tokenize`] collects it. Each call to
/// `next` yields the next literal or element part, walking the input left
/// to right:
///
/// 1. Everything before the next unescaped start boundary is a literal.
/// 2. The span from that start boundary through the matching unescaped end
///    boundary is an element part.
/// 3. If no end boundary follows, the rest of the input is a literal.
pub struct Tokenizer<'a> {
    text: &'a str,
    boundaries: &'a Boundaries,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `text` with the given boundary triple.
    pub fn new(text: &'a str, boundaries: &'a Boundaries) -> Self {
        Self {
            text,
            boundaries,
            pos: 0,
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = TemplatePart;

    fn next(&mut self) -> Option<TemplatePart> {
        if self.pos >= self.text.len() {
            return None;
        }

        let start = &self.boundaries.start;
        let end = &self.boundaries.end;

        let Some(open) = start.find(self.text, self.pos) else {
            // No further element reference; the tail is literal.
            let part = TemplatePart::literal(&self.text[self.pos..]);
            self.pos = self.text.len();
            return Some(part);
        };

        if open > self.pos {
            let part = TemplatePart::literal(&self.text[self.pos..open]);
            self.pos = open;
            return Some(part);
        }

        match end.shift_past(self.text, open + start.len()) {
            Some(close) => {
                let part = TemplatePart::element(&self.text[open..close], start.len(), end.len());
                self.pos = close;
                Some(part)
            }
            None => {
                // Unterminated reference: degrade to literal text.
                let part = TemplatePart::literal(&self.text[open..]);
                self.pos = self.text.len();
                Some(part)
            }
        }
    }
}

/// Tokenizes a whole template into its ordered part sequence.
pub fn tokenize(text: &str, boundaries: &Boundaries) -> Vec<TemplatePart> {
    Tokenizer::new(text, boundaries).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    // Text with no boundary characters at all.
    fn plain_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,!:;'\"-]{0,40}"
    }

    // Element names in the shape resolvers expect.
    fn element_name() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9]{0,10}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn plain_text_is_one_literal(text in plain_text()) {
            let parts = tokenize(&text, &Boundaries::default());
            if text.is_empty() {
                prop_assert!(parts.is_empty());
            } else {
                prop_assert_eq!(parts.len(), 1);
                prop_assert_eq!(parts[0].kind(), PartKind::Literal);
            }
        }

        #[test]
        fn raw_concatenation_round_trips(
            prefix in plain_text(),
            name in element_name(),
            suffix in plain_text(),
        ) {
            let text = format!("{}{{{}}}{}", prefix, name, suffix);
            let parts = tokenize(&text, &Boundaries::default());
            let joined: String = parts.iter().map(|p| p.raw()).collect();
            prop_assert_eq!(joined, text);
        }

        #[test]
        fn round_trips_with_escapes(
            a in plain_text(),
            b in plain_text(),
            name in element_name(),
        ) {
            let text = format!("{}{{{{{}}}}}{{{}}}", a, b, name);
            let parts = tokenize(&text, &Boundaries::default());
            let joined: String = parts.iter().map(|p| p.raw()).collect();
            prop_assert_eq!(joined, text);
        }

        #[test]
        fn element_is_recovered(name in element_name()) {
            let text = format!("x{{{}}}y", name);
            let parts = tokenize(&text, &Boundaries::default());
            prop_assert_eq!(parts.len(), 3);
            prop_assert!(parts[1].is_element());
            prop_assert_eq!(parts[1].inner(), name.as_str());
        }

        #[test]
        fn never_panics_on_arbitrary_input(text in ".{0,80}") {
            let parts = tokenize(&text, &Boundaries::default());
            let joined: String = parts.iter().map(|p| p.raw()).collect();
            prop_assert_eq!(joined, text);
        }
    }
}
