//! Validated type references.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{ResolveError, Result};

/// Separator between path segments of a type name.
pub const PATH_SEPARATOR: &str = "::";

/// A syntactically valid type reference such as `Accounts::User`.
///
/// Every segment is a Rust-style identifier and the last segment starts with
/// an uppercase ASCII letter. Parsing says nothing about whether the type is
/// registered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(String);

impl TypeName {
    /// Parses `text` into a type name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::BadTypeName`] when `text` is not a type path.
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = text.split(PATH_SEPARATOR).peekable();
        while let Some(segment) = segments.next() {
            let is_last = segments.peek().is_none();
            if !is_identifier(segment) || (is_last && !starts_uppercase(segment)) {
                return Err(ResolveError::BadTypeName {
                    text: text.to_string(),
                });
            }
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the final path segment (`User` for `Accounts::User`).
    pub fn short_name(&self) -> &str {
        self.0
            .rsplit(PATH_SEPARATOR)
            .next()
            .unwrap_or(self.0.as_str())
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn starts_uppercase(segment: &str) -> bool {
    segment.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

impl FromStr for TypeName {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
