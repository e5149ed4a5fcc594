//! Element attribute parsing and typed lookup.
//!
//! Attributes travel in the element token as a query string:
//! `{datetime?format=%25Y}` carries `format` = `%Y`. Pairs are separated by
//! `&`, keys and values are percent-decoded, and duplicate keys keep the
//! last value. Keys are matched case-sensitively.
//!
//! Lookup helpers cover the configuration surface elements need: alias
//! lists (abbreviated attribute names), defaults, required-ness, and custom
//! string-to-value converters.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::FormatError;

/// A parsed, immutable attribute set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    entries: HashMap<String, String>,
}

impl Attrs {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string into an attribute set.
    ///
    /// Pairs without `=` become a key with an empty value. Malformed
    /// percent sequences are kept verbatim rather than rejected; attribute
    /// *values* are free-form text as far as parsing is concerned.
    pub fn parse(query: &str) -> Self {
        let mut entries = HashMap::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k, v),
                None => (pair, ""),
            };
            entries.insert(decode(key).into_owned(), decode(value).into_owned());
        }
        Self { entries }
    }

    /// Builds an attribute set from explicit pairs, bypassing decoding.
    ///
    /// Used for the `@` parameter shorthand, where name and value come from
    /// literal template text rather than a query string.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no attributes were supplied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a single attribute by exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Looks up an attribute under any of its names, first match wins.
    ///
    /// The first entry in `names` is the canonical name; the rest are
    /// abbreviated aliases.
    pub fn get_any(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }

    /// Looks up an attribute, falling back to a default value.
    pub fn get_or<'a>(&'a self, names: &[&str], default: &'a str) -> &'a str {
        self.get_any(names).unwrap_or(default)
    }

    /// Looks up a required attribute.
    ///
    /// Fails with a configuration error naming `element` and the canonical
    /// attribute name when the attribute is absent under every alias.
    pub fn required(&self, element: &str, names: &[&str]) -> Result<&str, FormatError> {
        self.get_any(names).ok_or_else(|| FormatError::MissingAttribute {
            element: element.to_string(),
            attribute: names.first().copied().unwrap_or_default().to_string(),
        })
    }

    /// Looks up an optional attribute and converts it.
    ///
    /// `convert` returning `None` is a configuration error naming the
    /// element, attribute, and offending value. An absent attribute is
    /// `Ok(None)`.
    pub fn convert<T, F>(
        &self,
        element: &str,
        names: &[&str],
        convert: F,
    ) -> Result<Option<T>, FormatError>
    where
        F: Fn(&str) -> Option<T>,
    {
        match self.get_any(names) {
            None => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| FormatError::InvalidAttribute {
                    element: element.to_string(),
                    attribute: names.first().copied().unwrap_or_default().to_string(),
                    value: value.to_string(),
                }),
        }
    }

    /// Iterates over the attribute pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn decode(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(raw),
    }
}
