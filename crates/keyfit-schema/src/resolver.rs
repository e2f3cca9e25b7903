//! Field resolution and record construction.
//!
//! Keys are checked against the symbol table with [`SymbolTable::lookup`]
//! and then against the record's declared fields. Text that is not already
//! an identifier is never turned into one.
//!
//! [`SymbolTable::lookup`]: crate::SymbolTable::lookup

use serde::Serialize;
use serde_json::Value;

use crate::TYPE_KEY;
use crate::error::{ResolveError, Result};
use crate::ident::Ident;
use crate::record::{Record, TextMap};
use crate::registry::{RecordType, TypeRegistry};

impl TypeRegistry {
    /// Returns the field identifier for `key` if it is a declared field.
    ///
    /// Unknown text is not an error here: callers treat it as residual.
    pub fn resolve_field(&self, record_type: &RecordType, key: &str) -> Option<Ident> {
        let ident = self.symbols().lookup(key)?;
        record_type.has_field(key).then_some(ident)
    }

    /// Like [`TypeRegistry::resolve_field`] but reports why a key failed.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::UnknownIdentifierText`] if `key` is not an identifier at all.
    /// - [`ResolveError::UnknownRecordField`] if it is, but not a field of `record_type`.
    pub fn resolve_field_strict(&self, record_type: &RecordType, key: &str) -> Result<Ident> {
        let ident = self
            .symbols()
            .lookup(key)
            .ok_or_else(|| ResolveError::UnknownIdentifierText {
                text: key.to_string(),
            })?;
        if record_type.has_field(key) {
            Ok(ident)
        } else {
            Err(ResolveError::UnknownRecordField {
                name: record_type.name().to_string(),
                field: key.to_string(),
            })
        }
    }

    /// Builds an instance of `record_type` from `fields`.
    ///
    /// Entries that do not name a declared field are returned as the
    /// residual, keyed exactly as they arrived.
    pub fn build_record(&self, record_type: &RecordType, fields: TextMap) -> (Record, TextMap) {
        let mut record = Record::with_defaults(record_type);
        let mut residual = TextMap::new();
        for (key, value) in fields {
            match self.resolve_field(record_type, &key) {
                Some(ident) => {
                    record.set(ident, value);
                }
                None => {
                    residual.insert(key, value);
                }
            }
        }
        tracing::trace!(
            record = %record_type.name(),
            residual = residual.len(),
            "Built record"
        );
        (record, residual)
    }

    /// Builds an instance of `record_type`, failing on the first unknown key.
    pub fn build_record_strict(&self, record_type: &RecordType, fields: TextMap) -> Result<Record> {
        let mut record = Record::with_defaults(record_type);
        for (key, value) in fields {
            let ident = self.resolve_field_strict(record_type, &key)?;
            record.set(ident, value);
        }
        Ok(record)
    }

    /// Builds a record whose type is named by the map's `__type__` entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingTypeKey`] when the entry is absent or
    /// not a string, and the usual type resolution errors for its value.
    pub fn record_from_tagged_map(&self, fields: TextMap) -> Result<(Record, TextMap)> {
        let (record_type, fields) = self.split_type_key(fields)?;
        Ok(self.build_record(&record_type, fields))
    }

    /// Strict counterpart of [`TypeRegistry::record_from_tagged_map`].
    pub fn strict_record_from_tagged_map(&self, fields: TextMap) -> Result<Record> {
        let (record_type, fields) = self.split_type_key(fields)?;
        self.build_record_strict(&record_type, fields)
    }

    /// Converts a registered Rust value into a record of its registered type.
    pub fn record_from_typed<T: Serialize + 'static>(&self, value: &T) -> Result<Record> {
        let name = self
            .name_of::<T>()
            .ok_or_else(|| ResolveError::UnknownType {
                name: std::any::type_name::<T>().to_string(),
            })?;
        let record_type = self.resolve_record(name.as_str())?;
        let encoded = serde_json::to_value(value).map_err(|source| ResolveError::Serde {
            name: name.to_string(),
            source,
        })?;
        let Value::Object(object) = encoded else {
            return Err(ResolveError::NotARecordType {
                name: name.to_string(),
            });
        };
        self.build_record_strict(&record_type, object.into_iter().collect())
    }

    fn split_type_key(&self, mut fields: TextMap) -> Result<(RecordType, TextMap)> {
        let Some(Value::String(name)) = fields.remove(TYPE_KEY) else {
            return Err(ResolveError::MissingTypeKey);
        };
        let record_type = self.resolve_record(&name)?;
        Ok((record_type, fields))
    }
}
