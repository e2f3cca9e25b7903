//! Conversion options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::transform::Transformation;

/// How entries that match no field are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum RestMode {
    /// Drop them.
    #[default]
    Discard,
    /// Return them next to the record.
    Separate,
    /// Store them in the record's reserved `__rest__` field.
    Merge,
}

impl RestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestMode::Discard => "discard",
            RestMode::Separate => "separate",
            RestMode::Merge => "merge",
        }
    }
}

impl fmt::Display for RestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestMode {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "discard" => Ok(RestMode::Discard),
            "separate" => Ok(RestMode::Separate),
            "merge" => Ok(RestMode::Merge),
            _ => Err(MapError::UnknownRestMode {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for RestMode {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Options for a conversion call.
///
/// The default is exact matching only, with unmatched entries discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Applied in order to keys that match no field verbatim.
    pub transformations: Vec<Transformation>,
    pub rest: RestMode,
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from their configuration names.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown transformation or rest mode name.
    pub fn from_names<I, S>(transformations: I, rest: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let transformations = transformations
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Transformation>>>()?;
        Ok(Self {
            transformations,
            rest: rest.parse()?,
        })
    }

    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformations.push(transformation);
        self
    }

    pub fn with_rest(mut self, rest: RestMode) -> Self {
        self.rest = rest;
        self
    }

    /// Returns true when only verbatim key matches are attempted.
    pub fn is_exact_only(&self) -> bool {
        self.transformations.is_empty()
    }
}
