//! Error types for template compilation and rendering.
//!
//! All public entry points return [`FormatError`]. Configuration problems
//! (duplicate registrations, missing or malformed attributes, bad boundary
//! setups) surface at compile time; rendering either succeeds completely or
//! returns the first error without handing the caller partial output.

use keyfmt_parser::BoundaryError;
use thiserror::Error;

/// Error type for formatter operations.
#[derive(Debug, Error)]
pub enum FormatError {
    /// An element with this name is already registered.
    #[error("element \"{name}\" already exists")]
    ElementExists {
        /// The contested element name.
        name: String,
    },

    /// No element with this name is registered.
    ///
    /// Raised only by direct registry queries. Template resolution never
    /// raises it; unknown references degrade to literal text instead.
    #[error("element \"{name}\" does not exist")]
    ElementNotFound {
        /// The requested element name.
        name: String,
    },

    /// A required attribute is absent and has no default.
    #[error("element \"{element}\" is missing required attribute \"{attribute}\"")]
    MissingAttribute {
        /// The element being configured.
        element: String,
        /// The absent attribute.
        attribute: String,
    },

    /// An attribute value failed conversion.
    #[error("invalid value \"{value}\" for attribute \"{attribute}\" of element \"{element}\"")]
    InvalidAttribute {
        /// The element being configured.
        element: String,
        /// The offending attribute.
        attribute: String,
        /// The value that failed to convert.
        value: String,
    },

    /// Malformed boundary configuration.
    #[error("invalid boundary: {0}")]
    Boundary(#[from] BoundaryError),

    /// Data serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A dynamic element failed while producing output.
    #[error("render error: {0}")]
    Render(String),
}
