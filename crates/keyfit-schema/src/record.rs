//! Record instances built by the resolver.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ResolveError, Result};
use crate::ident::Ident;
use crate::registry::RecordType;
use crate::type_name::TypeName;

/// Text-keyed entries: the resolver's input and the residual it returns.
pub type TextMap = BTreeMap<String, Value>;

/// Identifier-keyed entries.
pub type IdentMap = BTreeMap<Ident, Value>;

/// An instance of a record type.
///
/// Every declared field is present; fields not populated from input hold
/// the type's default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    type_name: TypeName,
    fields: IdentMap,
}

impl Record {
    /// Creates the default instance of `record_type`.
    pub fn with_defaults(record_type: &RecordType) -> Self {
        Self {
            type_name: record_type.name().clone(),
            fields: record_type.defaults(),
        }
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &IdentMap {
        &self.fields
    }

    /// Writes `value` at `field`, returning the value it replaces.
    pub fn set(&mut self, field: Ident, value: Value) -> Option<Value> {
        self.fields.insert(field, value)
    }

    /// Copies the fields into a map keyed by each identifier's text.
    pub fn to_text_map(&self) -> TextMap {
        self.fields
            .iter()
            .map(|(ident, value)| (ident.as_str().to_string(), value.clone()))
            .collect()
    }

    pub fn into_ident_map(self) -> IdentMap {
        self.fields
    }

    /// Decodes the record into a Rust value through serde.
    ///
    /// Fields the target does not declare are ignored unless it opts into
    /// `deny_unknown_fields`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        let object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(ident, value)| (ident.as_str().to_string(), value.clone()))
            .collect();
        serde_json::from_value(Value::Object(object)).map_err(|source| ResolveError::Serde {
            name: self.type_name.to_string(),
            source,
        })
    }
}
