//! Field enumeration for record types.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ResolveError, Result};

/// A declared field and the value it holds in a default instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub default: Value,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }

    /// A field whose default is `null`.
    pub fn nullable(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }
}

/// Capability exposed by every record type: its fields and their defaults.
///
/// Field order carries no meaning.
pub trait RecordSchema: fmt::Debug + Send + Sync {
    fn fields(&self) -> &[FieldDef];
}

/// A record schema held as a plain list of field definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticSchema {
    fields: Vec<FieldDef>,
}

impl StaticSchema {
    pub fn new(fields: impl IntoIterator<Item = FieldDef>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Builds a schema of nullable fields from their names.
    pub fn with_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(FieldDef::nullable))
    }

    /// Derives the schema of a Rust struct from its serde representation.
    ///
    /// Field names are the serialized names and defaults come from
    /// `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotARecordType`] when `T` does not serialize
    /// to a map, and [`ResolveError::Serde`] when serialization fails.
    pub fn of<T: Serialize + Default>() -> Result<Self> {
        let name = std::any::type_name::<T>();
        let value = serde_json::to_value(T::default()).map_err(|source| ResolveError::Serde {
            name: name.to_string(),
            source,
        })?;
        match value {
            Value::Object(map) => Ok(Self::new(
                map.into_iter()
                    .map(|(field, default)| FieldDef::new(field, default)),
            )),
            _ => Err(ResolveError::NotARecordType {
                name: name.to_string(),
            }),
        }
    }
}

impl RecordSchema for StaticSchema {
    fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Default, Serialize)]
    struct Account {
        username: String,
        #[serde(rename = "loginCount")]
        login_count: u32,
        nickname: Option<String>,
    }

    #[test]
    fn derives_fields_from_serde_representation() {
        let schema = StaticSchema::of::<Account>().unwrap();
        let mut fields = schema.fields().to_vec();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            fields,
            vec![
                FieldDef::new("loginCount", json!(0)),
                FieldDef::new("nickname", Value::Null),
                FieldDef::new("username", json!("")),
            ]
        );
    }

    #[test]
    fn scalar_types_are_not_records() {
        let err = StaticSchema::of::<u32>().unwrap_err();
        assert!(matches!(err, ResolveError::NotARecordType { .. }));
    }
}
