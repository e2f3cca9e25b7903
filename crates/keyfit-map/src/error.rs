//! Error types for map-to-record conversion.

use keyfit_schema::ResolveError;
use thiserror::Error;

use crate::key::Key;

/// Errors from conversion entry points.
///
/// Configuration errors ([`MapError::UnknownTransformationName`],
/// [`MapError::UnknownRestMode`]) surface while options are parsed, before
/// any input is looked at.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    /// Destination type or field resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A strict entry point received a key that is not text.
    #[error("expected a text key, found {key}")]
    TextKeyRequired { key: Key },

    /// Key normalization met a key that is neither text nor an identifier.
    #[error("key is neither text nor an identifier: {key}")]
    NonTextNonIdentifierKey { key: Key },

    /// Key normalization met the same spelling as both text and identifier.
    #[error("key {key:?} appears both as text and as an identifier")]
    DuplicateKey { key: String },

    /// Options named a transformation that does not exist.
    #[error("unknown transformation: {name:?}")]
    UnknownTransformationName { name: String },

    /// Options named a rest mode that does not exist.
    #[error("unknown rest mode: {name:?}")]
    UnknownRestMode { name: String },
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, MapError>;
