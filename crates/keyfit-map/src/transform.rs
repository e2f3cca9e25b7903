//! Fallback key transformations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// A rewrite applied to keys that do not match any field verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Transformation {
    /// `FirstName` and `first-name` become `first_name`.
    SnakeCase,
}

impl Transformation {
    /// All transformations, in the order they are documented.
    pub const ALL: &'static [Transformation] = &[Transformation::SnakeCase];

    /// Returns the configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Transformation::SnakeCase => "snake_case",
        }
    }

    pub fn apply(&self, key: &str) -> String {
        match self {
            Transformation::SnakeCase => to_snake_case(key),
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transformation {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Transformation::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| MapError::UnknownTransformationName {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for Transformation {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Rewrites `text` as lower snake case.
///
/// A separator goes in front of an uppercase letter that follows a
/// lowercase letter or digit, and in front of the last capital of an
/// acronym followed by a lowercase letter (`HTTPServer` is `http_server`).
/// Hyphens, spaces and dots become underscores.
pub fn to_snake_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);
    for (idx, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | ' ' | '.') {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if !c.is_uppercase() {
            out.push(c);
            continue;
        }
        let prev = idx.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(idx + 1).copied();
        let boundary = match prev {
            Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
            Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
            _ => false,
        };
        if boundary && !out.ends_with('_') {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}
