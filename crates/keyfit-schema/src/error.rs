//! Error types for type and field resolution.

use thiserror::Error;

/// Errors raised while resolving destination types and fields.
///
/// The `Display` text of every variant is the fixed message shown to callers
/// of the panicking entry points, so keep the wording stable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// A tagged map carried no `__type__` entry, or a non-string one.
    #[error("the given map has no \"__type__\" key")]
    MissingTypeKey,

    /// The text does not have the shape of a type reference.
    #[error("not a valid type name: {text:?}")]
    BadTypeName { text: String },

    /// The type name is well formed but nothing by that name is registered.
    #[error("type does not exist: {name}")]
    UnknownType { name: String },

    /// The type exists but has no enumerable fields.
    #[error("type is not a record type: {name}")]
    NotARecordType { name: String },

    /// The text is not an identifier known to the symbol table.
    #[error("identifier does not exist: {text:?}")]
    UnknownIdentifierText { text: String },

    /// The identifier exists but is not a field of the record type.
    #[error("unknown field {field:?} for record type {name}")]
    UnknownRecordField { name: String, field: String },

    /// A record could not be converted to or from its Rust representation.
    #[error("failed to convert record {name} through serde: {source}")]
    Serde {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
