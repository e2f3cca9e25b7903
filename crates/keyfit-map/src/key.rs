//! Source map keys and key normalization.

use std::collections::BTreeMap;
use std::fmt;

use keyfit_schema::{Ident, TextMap};
use serde_json::{Map, Value};

use crate::error::{MapError, Result};

/// A key of a conversion input.
///
/// Payloads decoded from text formats only carry [`Key::Text`]; the other
/// kinds appear when maps are assembled in code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Text(String),
    /// An identifier that already exists in the symbol table.
    Ident(Ident),
    Int(i64),
    Bool(bool),
}

impl Key {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Text(text) => write!(f, "{text:?}"),
            Key::Ident(ident) => write!(f, "identifier {ident}"),
            Key::Int(value) => write!(f, "{value}"),
            Key::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<Ident> for Key {
    fn from(value: Ident) -> Self {
        Key::Ident(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::Bool(value)
    }
}

/// The conversion input: keys of any kind mapped to arbitrary values.
pub type SourceMap = BTreeMap<Key, Value>;

/// Wraps a decoded JSON object as a source map.
pub fn source_from_json(object: Map<String, Value>) -> SourceMap {
    object
        .into_iter()
        .map(|(key, value)| (Key::Text(key), value))
        .collect()
}

/// Converts identifier keys to their text, keeping text keys as they are.
///
/// # Errors
///
/// - [`MapError::NonTextNonIdentifierKey`] for any other key kind.
/// - [`MapError::DuplicateKey`] when a text key and an identifier key share
///   the same spelling.
pub fn normalize_keys_to_text(source: SourceMap) -> Result<TextMap> {
    let mut normalized = TextMap::new();
    for (key, value) in source {
        let text = match key {
            Key::Text(text) => text,
            Key::Ident(ident) => ident.as_str().to_string(),
            other => return Err(MapError::NonTextNonIdentifierKey { key: other }),
        };
        if normalized.contains_key(&text) {
            return Err(MapError::DuplicateKey { key: text });
        }
        normalized.insert(text, value);
    }
    Ok(normalized)
}

/// Copies a source map whose keys must all be text.
///
/// Identifier keys are rejected too: the strict entry points never coerce.
pub(crate) fn require_text_keys(source: &SourceMap) -> Result<TextMap> {
    source
        .iter()
        .map(|(key, value)| match key {
            Key::Text(text) => Ok((text.clone(), value.clone())),
            other => Err(MapError::TextKeyRequired { key: other.clone() }),
        })
        .collect()
}
